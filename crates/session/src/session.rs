use std::sync::Arc;

use labyrinth_common::{ExitSignal, GameSettings, RenderMode, SettingsError, View};
use labyrinth_input::{Camera, IntentHandle, Mover, MoverConfig, MoverError, MoverStatus};
use labyrinth_kernel::{KernelError, Maze};
use labyrinth_persist::{PersistError, SaveRecord};
use labyrinth_render::{FrameBuffer, RenderError, Renderer, RendererDetails, TexturePack, build_renderer};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Errors surfaced by a session, wrapping each layer's own error.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Kernel(#[from] KernelError),
    #[error(transparent)]
    Mover(#[from] MoverError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Result of one tick: what the mover did and the frame drawn afterwards.
#[derive(Debug)]
pub struct Tick {
    pub status: MoverStatus,
    pub frame: FrameBuffer,
}

/// Builtin pack, or the directory named in the settings.
pub fn load_textures(settings: &GameSettings) -> Result<TexturePack, RenderError> {
    match &settings.texture_dir {
        Some(dir) => TexturePack::load_dir(dir),
        None => Ok(TexturePack::builtin()),
    }
}

/// A running game.
pub struct Session {
    settings: GameSettings,
    maze: Maze,
    textures: TexturePack,
    camera: Camera,
    renderer: Box<dyn Renderer>,
    exit: Arc<ExitSignal>,
    ticks: u64,
}

impl Session {
    /// Start a game on a freshly generated maze from an OS-seeded RNG.
    pub fn new_game(settings: GameSettings) -> Result<Self, SessionError> {
        Self::new_game_with_rng(settings, StdRng::from_entropy())
    }

    pub fn new_game_with_rng<R: Rng>(settings: GameSettings, rng: R) -> Result<Self, SessionError> {
        settings.validate()?;
        let textures = load_textures(&settings)?;
        let maze = Maze::generate(settings.grid_size, settings.grid_size, textures.wall_count(), rng)?;
        let view = maze.spawn_view(settings.fov);
        tracing::info!(
            grid = settings.grid_size,
            entry = ?maze.entry(),
            exit = ?maze.exit(),
            "new game"
        );
        Self::assemble(settings, textures, maze, view)
    }

    /// Resume from a save. The generator is not run.
    pub fn restore(settings: GameSettings, record: &SaveRecord) -> Result<Self, SessionError> {
        settings.validate()?;
        let textures = load_textures(&settings)?;
        let (maze, view) = record.restore()?;
        tracing::info!(position = ?view.position, "game restored");
        Self::assemble(settings, textures, maze, view)
    }

    fn assemble(
        settings: GameSettings,
        textures: TexturePack,
        maze: Maze,
        view: View,
    ) -> Result<Self, SessionError> {
        let exit = Arc::new(ExitSignal::new());
        let mover = Mover::new(
            MoverConfig {
                move_speed: settings.move_speed,
                rot_speed: settings.rot_speed,
                grace_frames: settings.grace_frames,
            },
            Arc::clone(&exit),
        )?;
        let renderer = Self::build(&settings, &textures, &maze, &exit, settings.render_mode, settings.threads)?;
        Ok(Self {
            settings,
            maze,
            textures,
            camera: Camera::new(view, mover),
            renderer,
            exit,
            ticks: 0,
        })
    }

    fn build(
        settings: &GameSettings,
        textures: &TexturePack,
        maze: &Maze,
        exit: &Arc<ExitSignal>,
        mode: RenderMode,
        threads: usize,
    ) -> Result<Box<dyn Renderer>, RenderError> {
        let details = RendererDetails::new(
            settings.width,
            settings.height,
            textures,
            maze.dense().clone(),
            settings.brightness,
            Arc::clone(exit),
        )?;
        build_renderer(mode, threads, Arc::new(details))
    }

    /// Integrate held intents, then draw the resulting view.
    pub fn tick(&mut self) -> Result<Tick, SessionError> {
        let status = self.camera.tick(self.maze.dense());
        if status == MoverStatus::Completed {
            tracing::info!(ticks = self.ticks, "maze completed");
        }
        let frame = self.renderer.render(self.camera.view())?;
        self.ticks += 1;
        Ok(Tick { status, frame })
    }

    /// Handle for toggling movement intents from any thread.
    pub fn intents(&self) -> IntentHandle {
        self.camera.intents()
    }

    /// Replace the renderer. On error the current one stays in place.
    pub fn swap_renderer(&mut self, mode: RenderMode, threads: usize) -> Result<(), SessionError> {
        let candidate = GameSettings {
            render_mode: mode,
            threads,
            ..self.settings.clone()
        };
        candidate.validate()?;
        self.renderer = Self::build(&candidate, &self.textures, &self.maze, &self.exit, mode, threads)?;
        self.settings = candidate;
        tracing::info!(%mode, threads, "renderer swapped");
        Ok(())
    }

    /// Replace the texture pack, rebuilding the renderer around it.
    pub fn swap_textures(&mut self, textures: TexturePack) -> Result<(), SessionError> {
        self.renderer = Self::build(
            &self.settings,
            &textures,
            &self.maze,
            &self.exit,
            self.settings.render_mode,
            self.settings.threads,
        )?;
        self.textures = textures;
        tracing::info!(walls = self.textures.wall_count(), "textures swapped");
        Ok(())
    }

    /// Capture the maze and current pose.
    pub fn save(&self) -> Result<SaveRecord, SessionError> {
        Ok(SaveRecord::capture(&self.maze, self.camera.view())?)
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn view(&self) -> &View {
        self.camera.view()
    }

    pub fn render_mode(&self) -> RenderMode {
        self.renderer.mode()
    }

    pub fn exit_signal(&self) -> &Arc<ExitSignal> {
        &self.exit
    }

    pub fn is_finished(&self) -> bool {
        self.camera.mover().is_finished()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
