use super::*;

#[test]
fn test_default_config() {
  let config = TerrainConfig::default();
  assert_eq!(config.patch_size, 64);
  assert_eq!(config.patch_samples(), 65);
  assert_eq!(config.scale, Vec3::ONE);
  assert_eq!(config.tile, IVec2::ZERO);
}

#[test]
fn test_validate_size_returns_depth() {
  let config = TerrainConfig::SMALL;
  assert_eq!(config.validate_size(5), Ok(1));
  assert_eq!(config.validate_size(9), Ok(2));
  assert_eq!(config.validate_size(17), Ok(3));

  let config = TerrainConfig::with_patch_size(64);
  assert_eq!(config.validate_size(513), Ok(3));
}

/// A raster the size of a single patch cannot produce four children.
#[test]
fn test_validate_size_rejects_single_patch() {
  let config = TerrainConfig::SMALL;
  assert!(matches!(
    config.validate_size(3),
    Err(TerrainError::InvalidDimension { .. })
  ));
}

#[test]
fn test_validate_size_rejects_non_power_of_two_multiple() {
  let config = TerrainConfig::SMALL;
  // 12 cells = 2 * 6
  assert!(config.validate_size(13).is_err());
  // even sample count
  assert!(config.validate_size(8).is_err());
  assert!(config.validate_size(0).is_err());
}

#[test]
fn test_validate_size_rejects_bad_patch_size() {
  for patch_size in [0, 1, 3, 6] {
    let config = TerrainConfig::with_patch_size(patch_size);
    let err = config.validate_size(65).unwrap_err();
    assert!(
      matches!(err, TerrainError::InvalidDimension { patch_size: p, .. } if p == patch_size),
      "patch size {} should be rejected",
      patch_size
    );
  }
}

#[test]
fn test_max_patch_lod() {
  assert_eq!(TerrainConfig::with_patch_size(2).max_patch_lod(), 1);
  assert_eq!(TerrainConfig::with_patch_size(4).max_patch_lod(), 1);
  assert_eq!(TerrainConfig::with_patch_size(8).max_patch_lod(), 2);
  assert_eq!(TerrainConfig::with_patch_size(64).max_patch_lod(), 5);
}
