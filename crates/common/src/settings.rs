use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Errors from loading or validating game settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("screen dimensions must be non-zero, got {width}x{height}")]
    ZeroDimension { width: usize, height: usize },
    #[error("field of view must be negative with magnitude >= 0.1, got {0}")]
    InvalidFov(f64),
    #[error("thread count must be non-zero for {0} rendering")]
    ZeroThreads(RenderMode),
    #[error("chunk rendering needs a thread count dividing the width: {width} % {threads} != 0")]
    ChunkMismatch { width: usize, threads: usize },
    #[error("maze grid size must be at least 1")]
    GridTooSmall,
    #[error("move speed must lie in (0, 1), got {0}")]
    InvalidMoveSpeed(f64),
    #[error("rotation speed must be finite and non-negative, got {0}")]
    InvalidRotSpeed(f64),
    #[error("brightness must be finite and positive, got {0}")]
    InvalidBrightness(f64),
    #[error("unknown render mode: {0}")]
    UnknownRenderMode(String),
}

/// How a frame's columns are spread over worker threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderMode {
    /// Every column on the calling thread.
    #[default]
    SingleThread,
    /// One pool job per screen column.
    Strip,
    /// `threads` contiguous column ranges, one job each.
    Chunk,
}

impl RenderMode {
    pub const ALL: [RenderMode; 3] = [RenderMode::SingleThread, RenderMode::Strip, RenderMode::Chunk];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::SingleThread => "single-thread",
            Self::Strip => "strip",
            Self::Chunk => "chunk",
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderMode {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| SettingsError::UnknownRenderMode(s.to_string()))
    }
}

/// Everything the outer UI layer hands to the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Output width in pixels.
    pub width: usize,
    /// Output height in pixels.
    pub height: usize,
    /// Camera plane factor; negative, magnitude at least 0.1.
    pub fov: f64,
    /// Directory holding `entry.png`, `exit.png`, `wall1.png`, ...;
    /// `None` selects the builtin procedural pack.
    pub texture_dir: Option<PathBuf>,
    pub render_mode: RenderMode,
    /// Worker threads for strip mode; number of chunks for chunk mode.
    pub threads: usize,
    /// Maze size in cells per side.
    pub grid_size: usize,
    /// Cells advanced per tick while a move intent is held.
    pub move_speed: f64,
    /// Radians turned per tick while a pan intent is held.
    pub rot_speed: f64,
    /// Multiplier applied to every rendered color.
    pub brightness: f64,
    /// Ticks the player may keep moving after reaching the exit.
    pub grace_frames: u32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            fov: -0.66,
            texture_dir: None,
            render_mode: RenderMode::SingleThread,
            threads: 4,
            grid_size: 10,
            move_speed: 0.08,
            rot_speed: 0.045,
            brightness: 1.0,
            grace_frames: 30,
        }
    }
}

impl GameSettings {
    /// Parse settings from YAML. Missing keys take their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load and validate a YAML settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Check every constraint the renderer and mover rely on.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.width == 0 || self.height == 0 {
            return Err(SettingsError::ZeroDimension {
                width: self.width,
                height: self.height,
            });
        }
        if !self.fov.is_finite() || self.fov >= 0.0 || self.fov.abs() < 0.1 {
            return Err(SettingsError::InvalidFov(self.fov));
        }
        match self.render_mode {
            RenderMode::SingleThread => {}
            mode if self.threads == 0 => return Err(SettingsError::ZeroThreads(mode)),
            RenderMode::Chunk if self.width % self.threads != 0 => {
                return Err(SettingsError::ChunkMismatch {
                    width: self.width,
                    threads: self.threads,
                });
            }
            _ => {}
        }
        if self.grid_size == 0 {
            return Err(SettingsError::GridTooSmall);
        }
        if !(self.move_speed > 0.0 && self.move_speed < 1.0) {
            return Err(SettingsError::InvalidMoveSpeed(self.move_speed));
        }
        if !self.rot_speed.is_finite() || self.rot_speed < 0.0 {
            return Err(SettingsError::InvalidRotSpeed(self.rot_speed));
        }
        if !self.brightness.is_finite() || self.brightness <= 0.0 {
            return Err(SettingsError::InvalidBrightness(self.brightness));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        GameSettings::default().validate().unwrap();
    }

    #[test]
    fn fov_must_be_negative_and_wide_enough() {
        for fov in [0.66, 0.0, -0.05, f64::NAN] {
            let settings = GameSettings {
                fov,
                ..GameSettings::default()
            };
            assert!(matches!(settings.validate(), Err(SettingsError::InvalidFov(_))));
        }
        let settings = GameSettings {
            fov: -0.1,
            ..GameSettings::default()
        };
        settings.validate().unwrap();
    }

    #[test]
    fn chunk_threads_must_divide_width() {
        let settings = GameSettings {
            width: 640,
            threads: 3,
            render_mode: RenderMode::Chunk,
            ..GameSettings::default()
        };
        match settings.validate() {
            Err(SettingsError::ChunkMismatch { width, threads }) => {
                assert_eq!(width, 640);
                assert_eq!(threads, 3);
            }
            other => panic!("expected ChunkMismatch, got {other:?}"),
        }

        // Strip mode has no divisibility requirement.
        let settings = GameSettings {
            render_mode: RenderMode::Strip,
            ..settings
        };
        settings.validate().unwrap();
    }

    #[test]
    fn zero_threads_rejected_only_when_threaded() {
        let settings = GameSettings {
            threads: 0,
            ..GameSettings::default()
        };
        settings.validate().unwrap();
        let settings = GameSettings {
            render_mode: RenderMode::Strip,
            ..settings
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::ZeroThreads(RenderMode::Strip))
        ));
    }

    #[test]
    fn move_speed_bounded_below_one_cell() {
        let settings = GameSettings {
            move_speed: 1.0,
            ..GameSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::InvalidMoveSpeed(_))
        ));
    }

    #[test]
    fn yaml_partial_uses_defaults() {
        let yaml = "width: 320\nheight: 200\nrender_mode: chunk\nthreads: 8\n";
        let settings = GameSettings::from_yaml_str(yaml).unwrap();
        assert_eq!(settings.width, 320);
        assert_eq!(settings.render_mode, RenderMode::Chunk);
        assert_eq!(settings.fov, -0.66);
        assert_eq!(settings.texture_dir, None);
    }

    #[test]
    fn yaml_directory_pack() {
        let yaml = "texture_dir: ./packs/stone\n";
        let settings = GameSettings::from_yaml_str(yaml).unwrap();
        assert_eq!(settings.texture_dir, Some(PathBuf::from("./packs/stone")));
    }

    #[test]
    fn load_from_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("settings.yaml");
        std::fs::write(&path, "grid_size: 7\nfov: -0.9\n").unwrap();
        let settings = GameSettings::load(&path).unwrap();
        assert_eq!(settings.grid_size, 7);
        assert_eq!(settings.fov, -0.9);
    }

    #[test]
    fn render_mode_parses_from_str() {
        for mode in RenderMode::ALL {
            assert_eq!(mode.to_string().parse::<RenderMode>().unwrap(), mode);
        }
        assert!("parallel".parse::<RenderMode>().is_err());
    }
}
