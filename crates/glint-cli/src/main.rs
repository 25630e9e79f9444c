use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use glint_card::{
    stack, CardSnapshot, CardStyle, FoilParams, JsonPresetStore, Layer, LightParams, PresetStore,
};
use glint_core::{Color, FrameBuffer, TiltSample};
use glint_render::{CardRenderer, ExplodedLayout};

#[derive(Parser)]
#[command(
    name = "glint",
    version,
    about = "Glint — Motion-reactive holographic card renderer",
    long_about = "Glint renders layered holographic trading cards on the CPU.\nBuild a card stack from a snapshot file or the built-in demo, tilt it,\nand write the result to a PNG."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a card snapshot to a PNG
    Render {
        /// Path to a snapshot .json file (omit for the built-in demo card)
        #[arg()]
        file: Option<PathBuf>,

        /// Output file path (default: output/card.png)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Tilt pitch in -1..=1
        #[arg(long, default_value_t = 0.0)]
        pitch: f32,

        /// Tilt roll in -1..=1
        #[arg(long, default_value_t = 0.0)]
        roll: f32,

        /// Animation time in seconds
        #[arg(long, default_value_t = 0.0)]
        time: f32,

        /// Render the exploded layer inspector instead of the flat card
        #[arg(long)]
        exploded: bool,

        /// Path to a .ttf font for exploded-view captions
        #[arg(long)]
        font: Option<PathBuf>,
    },

    /// Check a snapshot file for errors
    Check {
        /// Path to the snapshot .json file to check
        #[arg()]
        file: PathBuf,
    },

    /// Print the layer tree of a card stack as JSON
    Inspect {
        /// Path to a snapshot .json file (omit for the built-in demo card)
        #[arg()]
        file: Option<PathBuf>,
    },

    /// Manage saved card presets
    Presets {
        #[command(subcommand)]
        command: PresetCommands,
    },

    /// Display version and renderer info
    Info,
}

#[derive(Subcommand)]
enum PresetCommands {
    /// List saved presets
    List {
        /// Path to the preset store file
        #[arg(long, default_value = "presets.json")]
        store: PathBuf,
    },
    /// Save a snapshot file as a named preset
    Save {
        /// Path to the snapshot .json file
        #[arg()]
        file: PathBuf,

        /// Name for the preset
        #[arg()]
        name: String,

        /// Path to the preset store file
        #[arg(long, default_value = "presets.json")]
        store: PathBuf,
    },
    /// Delete a preset by id
    Delete {
        /// Preset id (UUID) to delete
        #[arg()]
        id: String,

        /// Path to the preset store file
        #[arg(long, default_value = "presets.json")]
        store: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match cli.command {
        Commands::Render {
            file,
            output,
            pitch,
            roll,
            time,
            exploded,
            font,
        } => cmd_render(file, output, pitch, roll, time, exploded, font),
        Commands::Check { file } => cmd_check(file),
        Commands::Inspect { file } => cmd_inspect(file),
        Commands::Presets { command } => match command {
            PresetCommands::List { store } => cmd_presets_list(store),
            PresetCommands::Save { file, name, store } => cmd_presets_save(file, name, store),
            PresetCommands::Delete { id, store } => cmd_presets_delete(id, store),
        },
        Commands::Info => cmd_info(),
    }
}

/// The demo card: the full premium stack over a gold base.
fn demo_stack() -> Vec<Layer> {
    stack(|b| {
        b.push(Layer::base(Color::GOLD));
        b.push(Layer::holographic_foil());
        b.push(Layer::sparkle());
        b.push(Layer::specular_highlight());
        b.push(Layer::plastic_foil());
    })
}

fn load_snapshot(file: &PathBuf) -> Result<CardSnapshot> {
    let source = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read file: {}", file.display()))?;
    serde_json::from_str(&source)
        .with_context(|| format!("failed to parse snapshot: {}", file.display()))
}

/// Resolve a snapshot file (or the demo defaults) into a style and stack.
fn resolve_card(file: Option<PathBuf>) -> Result<(CardStyle, Vec<Layer>)> {
    let Some(file) = file else {
        return Ok((CardStyle::new(), demo_stack()));
    };

    let snapshot = load_snapshot(&file)?;

    let mut style = CardStyle::new();
    let mut background = Color::TRANSPARENT;
    let mut base = Color::GOLD;
    let mut foil = FoilParams::default();
    let mut light = LightParams::default();
    snapshot.apply(&mut style, &mut background, &mut base, &mut foil, &mut light);

    let layers = stack(|b| {
        b.push(Layer::base(base));
        b.push(
            Layer::holographic_foil_on(base)
                .intensity(foil.intensity)
                .speed(foil.speed)
                .saturation(foil.saturation)
                .transparency(foil.transparency)
                .pattern(foil.pattern),
        );
        b.push(
            Layer::anisotropic_light()
                .intensity(light.intensity)
                .size(light.size)
                .stretch(light.stretch)
                .falloff(light.softness),
        );
        b.push(Layer::specular_highlight());
    });

    Ok((style, layers))
}

fn save_png(frame: &FrameBuffer, path: &PathBuf) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory: {}", parent.display()))?;
        }
    }
    let img =
        image::ImageBuffer::<image::Rgba<u8>, _>::from_raw(frame.width, frame.height, frame.data.clone())
            .context("frame buffer size mismatch")?;
    img.save(path)
        .with_context(|| format!("failed to write PNG: {}", path.display()))?;
    Ok(())
}

fn cmd_render(
    file: Option<PathBuf>,
    output: Option<PathBuf>,
    pitch: f32,
    roll: f32,
    time: f32,
    exploded: bool,
    font: Option<PathBuf>,
) -> Result<()> {
    let start = Instant::now();
    let (style, layers) = resolve_card(file)?;
    tracing::debug!(
        layers = layers.len(),
        exploded,
        "starting card render"
    );

    let mut renderer = if exploded {
        CardRenderer::exploded(style, ExplodedLayout::default())
    } else {
        CardRenderer::new(style)
    };

    if let Some(ref font_path) = font {
        renderer
            .load_label_font(font_path)
            .map_err(|e| anyhow::anyhow!("{}", e))
            .with_context(|| format!("failed to load font: {}", font_path.display()))?;
    }

    let tilt = TiltSample::new(pitch, roll);
    let frame = renderer
        .render(&layers, tilt, time)
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    let out = output.unwrap_or_else(|| PathBuf::from("output/card.png"));
    save_png(&frame, &out)?;

    println!("✨ Rendered {} layers", layers.len());
    println!("   Size:   {}x{}", frame.width, frame.height);
    println!("   Tilt:   pitch {:.2}, roll {:.2}", pitch, roll);
    println!("   Output: {}", out.display());
    println!("   Took:   {:.2}s", start.elapsed().as_secs_f64());
    Ok(())
}

fn cmd_check(file: PathBuf) -> Result<()> {
    let snapshot = load_snapshot(&file)?;

    if snapshot.card_width < 1.0 || snapshot.card_height < 1.0 {
        anyhow::bail!(
            "degenerate card size: {}x{}",
            snapshot.card_width,
            snapshot.card_height
        );
    }

    println!("✅ {} is a valid snapshot", file.display());
    println!(
        "   Card:  {}x{} (radius {})",
        snapshot.card_width, snapshot.card_height, snapshot.corner_radius
    );
    println!(
        "   Foil:  {}",
        if snapshot.foil_intensity.is_some() {
            "configured"
        } else {
            "defaults (legacy snapshot)"
        }
    );
    Ok(())
}

fn cmd_inspect(file: Option<PathBuf>) -> Result<()> {
    let (style, layers) = resolve_card(file)?;
    let renderer = CardRenderer::new(style);
    let infos = renderer.describe(&layers);
    println!("{}", serde_json::to_string_pretty(&infos)?);
    Ok(())
}

fn open_store(path: PathBuf) -> PresetStore {
    PresetStore::new(JsonPresetStore::new(path))
}

fn cmd_presets_list(store: PathBuf) -> Result<()> {
    let store = open_store(store);
    let presets = store.presets();
    if presets.is_empty() {
        println!("No presets saved yet. Try `glint presets save <file> <name>`.");
        return Ok(());
    }
    for preset in presets {
        println!(
            "{}  {}  ({}x{})",
            preset.id, preset.name, preset.snapshot.card_width, preset.snapshot.card_height
        );
    }
    Ok(())
}

fn cmd_presets_save(file: PathBuf, name: String, store: PathBuf) -> Result<()> {
    let snapshot = load_snapshot(&file)?;
    let mut store = open_store(store);
    let id = store
        .save(name.as_str(), snapshot)
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    println!("✅ Saved preset '{}' ({})", name, id);
    Ok(())
}

fn cmd_presets_delete(id: String, store: PathBuf) -> Result<()> {
    let id = uuid::Uuid::parse_str(&id).with_context(|| format!("invalid preset id: {}", id))?;
    let mut store = open_store(store);
    store.delete(id).map_err(|e| anyhow::anyhow!("{}", e))?;
    println!("🗑  Deleted preset {}", id);
    Ok(())
}

fn cmd_info() -> Result<()> {
    println!("✨ Glint Card Renderer");
    println!("   Version:   {}", env!("CARGO_PKG_VERSION"));
    println!("   Renderer:  CPU (row-parallel, deterministic)");
    println!("   Effects:   foil, specular, sparkle, metal, light, rim, glass");
    println!();
    println!("   Repository: https://github.com/glint-dev/glint");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_stack_has_premium_layers() {
        let layers = demo_stack();
        assert_eq!(layers.len(), 5);
    }

    #[test]
    fn test_resolve_card_from_snapshot_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snap.json");

        let snapshot = CardSnapshot::capture(
            &CardStyle::new().card_size(200.0, 280.0),
            Color::BLACK,
            Color::rgb(0.1, 0.2, 0.8),
            &FoilParams::default(),
            &LightParams::default(),
        );
        std::fs::write(&path, serde_json::to_string(&snapshot).unwrap()).unwrap();

        let (style, layers) = resolve_card(Some(path)).unwrap();
        assert_eq!(style.width, 200.0);
        assert_eq!(style.height, 280.0);
        assert_eq!(layers.len(), 4);

        // The foil's show-through uses the restored base color, not the
        // factory default.
        match &layers[1].kind {
            glint_card::LayerKind::HolographicFoil(foil_base, _) => {
                assert_eq!(*foil_base, Color::rgb(0.1, 0.2, 0.8));
            }
            other => panic!("expected foil layer, got {other:?}"),
        }
    }

    #[test]
    fn test_check_rejects_degenerate_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");

        let mut snapshot = CardSnapshot::capture(
            &CardStyle::new(),
            Color::BLACK,
            Color::GOLD,
            &FoilParams::default(),
            &LightParams::default(),
        );
        snapshot.card_width = 0.0;
        std::fs::write(&path, serde_json::to_string(&snapshot).unwrap()).unwrap();

        assert!(cmd_check(path).is_err());
    }

    #[test]
    fn test_save_png_round_trips_through_image_crate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/frame.png");

        let frame = FrameBuffer::solid(8, 8, &Color::RED);
        save_png(&frame, &path).unwrap();

        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded.dimensions(), (8, 8));
        assert_eq!(loaded.get_pixel(4, 4).0[0], 255);
    }
}
