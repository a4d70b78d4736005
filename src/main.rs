//! Headless runner: simulates a field at 60 Hz and logs what it would draw
//!
//! Run with: cargo run --features cli --bin field-cli -- [preset|config.json] [frames]
//! `FIELD_SEED` fixes the random seed.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use particle_field::core::config::{FieldConfig, Preset};
    use particle_field::core::Vec2;
    use particle_field::render::{DrawCommand, RecordingSurface};
    use particle_field::FieldHandle;
    use tracing::{info, warn};
    use tracing_subscriber::{fmt, EnvFilter};

    const FPS: u64 = 60;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,particle_field=debug"));
    fmt().with_env_filter(filter).with_target(true).init();

    let mut args = std::env::args().skip(1);
    let source = args.next().unwrap_or_else(|| "network".to_string());
    let frames: u64 = match args.next() {
        Some(n) => n.parse()?,
        None => 10 * FPS,
    };

    let mut config = if source.ends_with(".json") {
        FieldConfig::from_json(&std::fs::read_to_string(&source)?)?
    } else {
        FieldConfig::preset(Preset::from_name(&source)?)
    };
    match std::env::var("FIELD_SEED").map(|s| s.parse::<u64>()) {
        Ok(Ok(seed)) => config.seed = Some(seed),
        Ok(Err(e)) => warn!(error = %e, "Ignoring invalid FIELD_SEED"),
        Err(_) => {}
    }

    info!(source = %source, frames, seed = ?config.seed, "Starting headless run");

    let mut handle = FieldHandle::create(&config);
    let bounds = handle.field().bounds();
    let mut surface = RecordingSurface::new(bounds.width, bounds.height);

    for frame in 1..=frames {
        let now = frame as f64 / FPS as f64;
        handle.tick(now, &mut surface);
        let commands = surface.take();

        if frame % FPS != 0 {
            continue;
        }

        let particles = handle.field().particles();
        let (min, max) = particles.iter().fold(
            (Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)),
            |(lo, hi), p| (lo.min(p.position), hi.max(p.position)),
        );
        let (edges, mean_degree) = match handle.graph() {
            Some(graph) if !particles.is_empty() => {
                let total: usize = (0..particles.len()).map(|i| graph.degree(i)).sum();
                (graph.edges().len(), total as f32 / particles.len() as f32)
            }
            _ => (0, 0.0),
        };
        let texts = commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Text { .. }))
            .count();

        info!(
            t = now,
            edges,
            mean_degree = format!("{:.2}", mean_degree),
            hovered = ?handle.hovered(),
            respawns = handle.field().respawns(),
            draw_calls = commands.len(),
            glyphs = texts,
            min = ?min,
            max = ?max,
            "stats"
        );
    }

    handle.destroy();
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {}
