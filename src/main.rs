use selfdrive::simulation::error::DriveResult;
use selfdrive::simulation::params::SimulationParams;
use selfdrive::simulation::traffic::Traffic;
use tracing::{info, warn};

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    if let Err(err) = run() {
        tracing::error!(%err, "simulation failed");
        std::process::exit(1);
    }
}

fn run() -> DriveResult<()> {
    let params = match std::env::args().nth(1) {
        Some(path) => SimulationParams::load_from_file(path)?,
        None => SimulationParams::default(),
    };

    info!(
        ai_cars = params.ai_cars,
        steps = params.steps,
        "Starting headless traffic simulation"
    );

    let mut world = Traffic::new(&params)?;

    for step in 0..params.steps {
        world.step()?;

        if world.cars.is_empty() || world.damaged_count() == world.cars.len() {
            warn!(step, "All AI cars damaged, stopping early");
            break;
        }

        if step % 100 == 0 {
            if let Some(best) = world.best_car() {
                info!(
                    step,
                    best_y = best.pos.y,
                    damaged = world.damaged_count(),
                    "Progress"
                );
            }
        }
    }

    if let Some(best) = world.best_car() {
        info!(
            ticks = world.ticks,
            best_y = best.pos.y,
            damaged = world.damaged_count(),
            "Finished"
        );
    }
    Ok(())
}
