use std::io::Write;
use std::path::PathBuf;

use flate2::write::GzEncoder;
use flate2::Compression;

use real_terrain::assets::{AssetLoader, TerrainDump, TerrainDumpLoader};
use real_terrain::{Level, Terrain};

fn temp_path(suffix: &str) -> PathBuf {
    std::env::temp_dir().join(format!("real-terrain-{}{}", uuid::Uuid::new_v4(), suffix))
}

const TERRAIN_JSON: &str = r#"{
    "name": "Dunes",
    "num_vertices_x": 2,
    "num_vertices_y": 2,
    "heights": [0, 1, 2, 3],
    "weighted_texture_maps": [{"class": "TerrainWeightMapTexture", "path": "Dunes.Weights_0"}]
}"#;

#[tokio::test]
async fn test_load_plain_json() {
    let path = temp_path(".json");
    std::fs::write(&path, TERRAIN_JSON).unwrap();

    let loader = TerrainDumpLoader::new();
    let terrain = AssetLoader::<Terrain>::load(&loader, &path).await.unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(terrain.height_map().unwrap().dimensions(), (2, 2));
    assert!(terrain.info().contains("Vertices: 2x2 (4)"));
    assert_eq!(terrain.weighted_texture_maps.len(), 1);
}

#[tokio::test]
async fn test_load_gzip_json() {
    let path = temp_path(".json.gz");
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(TERRAIN_JSON.as_bytes()).unwrap();
    std::fs::write(&path, encoder.finish().unwrap()).unwrap();

    let loader = TerrainDumpLoader::new();
    let terrain = AssetLoader::<Terrain>::load(&loader, &path).await.unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(terrain.base.name.as_deref(), Some("Dunes"));
    assert_eq!(terrain.heights, vec![0, 1, 2, 3]);
}

#[tokio::test]
async fn test_bare_terrain_loads_as_level() {
    let path = temp_path(".json");
    let terrain = Terrain::with_heights(1, 2, vec![10, 20]).unwrap();
    std::fs::write(&path, serde_json::to_string(&TerrainDump::from(&terrain)).unwrap()).unwrap();

    let loader = TerrainDumpLoader::new();
    let level = AssetLoader::<Level>::load(&loader, &path).await.unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(level.len(), 1);
    let text = level.export_to_t3d().unwrap();
    assert!(text.starts_with("Begin Map\n"));
    assert!(text.contains("Name=Terrain_0 "));
    assert!(text.contains("            10\n            20\n"));
}

#[tokio::test]
async fn test_level_without_terrain() {
    let path = temp_path(".json");
    std::fs::write(&path, r#"{"level": "Empty", "actors": [{"class": "Light"}]}"#).unwrap();

    let loader = TerrainDumpLoader::new();
    let result = AssetLoader::<Terrain>::load(&loader, &path).await;
    std::fs::remove_file(&path).ok();

    let err = result.unwrap_err();
    assert!(err.to_string().contains("No terrain found"));
}

#[tokio::test]
async fn test_missing_file() {
    let loader = TerrainDumpLoader::new();
    let result = AssetLoader::<Terrain>::load(&loader, &temp_path(".json")).await;
    assert!(result.is_err());
}
