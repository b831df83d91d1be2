//! Game configuration

use serde::{Deserialize, Serialize};
use vector_engine::config::Config;

/// Game configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GameConfig {
    /// Gameplay settings
    pub gameplay: GameplayConfig,

    /// Collision broad-phase tuning
    pub collision: CollisionConfig,
}

/// Gameplay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameplayConfig {
    /// Seconds between shots
    pub firing_rate: f32,

    /// Bullet speed in units per second
    pub projectile_speed: f32,

    /// Bullets farther than this from the player on either axis are culled
    pub bullet_range: f32,

    /// Damage a bullet deals to a composite enemy
    pub bullet_damage: f32,

    /// Health each composite enemy spawns with
    pub enemy_health: f32,

    /// Enemies spawn with coordinates in [0, wave_spawn_extent)
    pub wave_spawn_extent: f32,

    /// Half-life of the player position spring, seconds
    pub player_halflife: f32,

    /// Half-life of the camera position spring, seconds
    pub camera_halflife: f32,

    /// Explosion size requested on bullet impact
    pub explosion_size: f32,

    /// Explosion lifetime requested on bullet impact, seconds
    pub explosion_lifetime: f32,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            firing_rate: 0.3,
            projectile_speed: 100.0,
            bullet_range: 700.0,
            bullet_damage: 10.0,
            enemy_health: 100.0,
            wave_spawn_extent: 200.0,
            player_halflife: 0.4,
            camera_halflife: 2.0,
            explosion_size: 6.0,
            explosion_lifetime: 0.4,
        }
    }
}

/// Collision broad-phase configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollisionConfig {
    /// Maximum items per quadtree leaf before subdivision
    pub max_items_per_node: usize,

    /// Maximum quadtree subdivision depth
    pub max_depth: u32,

    /// Extra margin around the bullet range when sizing the tree's world box
    pub world_margin: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            max_items_per_node: 20,
            max_depth: 8,
            world_margin: 50.0,
        }
    }
}

impl Config for GameConfig {}

impl GameConfig {
    /// Load configuration from file or return defaults if loading fails
    pub fn load_or_default(path: &str) -> Self {
        match Self::load_from_file(path) {
            Ok(config) => config,
            Err(err) => {
                log::info!("using default config ({path}: {err})");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_tuning() {
        let config = GameConfig::default();
        assert_eq!(config.gameplay.firing_rate, 0.3);
        assert_eq!(config.gameplay.projectile_speed, 100.0);
        assert_eq!(config.gameplay.bullet_range, 700.0);
        assert_eq!(config.collision.max_items_per_node, 20);
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let config = GameConfig::load_or_default("definitely-not-here.toml");
        assert_eq!(config.gameplay.bullet_range, 700.0);
    }
}
