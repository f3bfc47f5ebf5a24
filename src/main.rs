use anyhow::{bail, Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use tracing::info;

use real_terrain::assets::{AssetLoader, TerrainDumpLoader};
use real_terrain::config::{load_viewer_settings, HeightMapFormat, ViewerSettings};
use real_terrain::utils::logging::init_logging;
use real_terrain::{Level, Terrain, VERSION};

fn print_usage() {
    eprintln!("real-terrain {}", VERSION);
    eprintln!("Usage: real-terrain <command> <dump.json[.gz]> [output]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  info        Print a summary of the terrain");
    eprintln!("  heightmap   Write the height map image (format from viewer.toml)");
    eprintln!("  preview     Write an 8-bit normalized height map");
    eprintln!("  alpha <n>   Write alpha layer <n> as an 8-bit mask");
    eprintln!("  t3d         Export the terrain as a T3D actor block");
    eprintln!("  level       Export every actor in the dump as a T3D map");
}

fn default_output(input: &Path, suffix: &str, extension: &str) -> PathBuf {
    let stem = input
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.split('.').next())
        .unwrap_or("terrain");
    input.with_file_name(format!("{}{}.{}", stem, suffix, extension))
}

fn write_text(output: Option<&String>, text: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, text).with_context(|| format!("Failed to write {}", path))?;
            info!("Wrote {}", path);
        }
        None => print!("{}", text),
    }
    Ok(())
}

async fn run(args: &[String], settings: &ViewerSettings) -> Result<()> {
    let loader = TerrainDumpLoader::new();
    let command = args[1].as_str();
    let input = Path::new(&args[2]);

    match command {
        "info" => {
            let terrain = AssetLoader::<Terrain>::load(&loader, input).await?;
            println!("{}", terrain.info());
        }
        "heightmap" | "preview" => {
            let terrain = AssetLoader::<Terrain>::load(&loader, input).await?;
            let preview = command == "preview" || settings.heightmap.format == HeightMapFormat::Preview8;
            let output = args.get(3).map(PathBuf::from).unwrap_or_else(|| {
                let suffix = if preview { "_preview" } else { "_heightmap" };
                default_output(input, suffix, &settings.heightmap.extension)
            });
            if preview {
                terrain.height_map_preview()?.save(&output)?;
            } else {
                terrain.save_height_map(&output)?;
            }
            info!("Wrote {}", output.display());
        }
        "alpha" => {
            let Some(layer) = args.get(3) else {
                bail!("alpha requires a layer index");
            };
            let layer: usize = layer.parse().with_context(|| format!("Invalid layer index {}", layer))?;
            let terrain = AssetLoader::<Terrain>::load(&loader, input).await?;
            let output = args
                .get(4)
                .map(PathBuf::from)
                .unwrap_or_else(|| default_output(input, &format!("_alpha{}", layer), "png"));
            terrain.alpha_layer_image(layer)?.save(&output)?;
            info!("Wrote {}", output.display());
        }
        "t3d" => {
            let terrain = AssetLoader::<Terrain>::load(&loader, input).await?;
            let mut text = String::new();
            terrain.export_to_t3d_with(&mut text, 0, 0, &settings.export)?;
            write_text(args.get(3), &text)?;
        }
        "level" => {
            let level = AssetLoader::<Level>::load(&loader, input).await?;
            let text = level.export_to_t3d_with(&settings.export)?;
            write_text(args.get(3), &text)?;
        }
        other => {
            print_usage();
            bail!("Unknown command: {}", other);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        print_usage();
        std::process::exit(2);
    }

    let settings = load_viewer_settings().unwrap_or_default();
    init_logging(&settings.logging)?;

    run(&args, &settings).await
}
