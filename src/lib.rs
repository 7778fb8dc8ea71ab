//! # Selfdrive - Sensor-Driven Traffic Simulation
//!
//! A simulation of cars that drive themselves along a multi-lane road. Each
//! car casts a fan of rays against the road borders and surrounding traffic,
//! and a small feed-forward network turns the resulting proximity readings
//! into steering and throttle controls.
//!
//! ## Features
//!
//! - Segment and polygon intersection kernel
//! - Ray-casting sensor array with nearest-hit readings
//! - Feed-forward network with step activation
//! - Car kinematics and collision damage
//! - Parallel per-car updates with rayon
//! - Lossless JSON persistence of networks
//!
//! ## Core Modules
//!
//! - [`simulation::geometry`] - Intersection primitives
//! - [`simulation::sensor`] - Ray fan and readings
//! - [`simulation::network`] - Feed-forward evaluation
//! - [`simulation::car`] - Vehicle state and per-tick loop
//! - [`simulation::traffic`] - World stepping

/// Core simulation logic and data structures.
pub mod simulation {
    /// Vehicle state, kinematics, and control loop.
    pub mod car;
    /// Trait for entities that carry a sensor.
    ///
    /// The [`carrier::Carrier`] trait is implemented by anything that exposes a
    /// pose and an outline (currently [`car::Car`]).
    pub mod carrier;
    /// Driving controls derived from network outputs.
    pub mod controls;
    /// Error types shared by the pipeline.
    pub mod error;
    /// Segment and polygon intersection primitives.
    pub mod geometry;
    /// Feed-forward network implementation for car brains.
    pub mod network;
    /// Simulation parameters.
    pub mod params;
    /// Road layout and borders.
    pub mod road;
    /// Ray-casting sensor array.
    pub mod sensor;
    /// Traffic world with parallel car updates.
    pub mod traffic;
}
