use std::hint::black_box;
use std::sync::Arc;

use labyrinth_common::{ExitSignal, RenderMode};
use labyrinth_kernel::Maze;
use labyrinth_render::{FrameTimer, RendererDetails, TexturePack, build_renderer};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn bench_mode(maze: &Maze, mode: RenderMode, threads: usize, width: usize, height: usize, frames: usize) {
    let details = RendererDetails::new(
        width,
        height,
        &TexturePack::builtin(),
        maze.dense().clone(),
        1.0,
        Arc::new(ExitSignal::new()),
    )
    .map(Arc::new);
    let renderer = details.and_then(|d| build_renderer(mode, threads, d));
    let mut renderer = match renderer {
        Ok(r) => r,
        Err(err) => {
            println!("  {mode} x{threads}: skipped ({err})");
            return;
        }
    };

    let mut view = maze.spawn_view(-0.66);
    let mut timer = FrameTimer::new(frames);
    for _ in 0..frames {
        view.rotate(0.05);
        let frame = timer.time(|| renderer.render(black_box(&view)));
        black_box(frame.ok());
    }
    println!(
        "  {mode} x{threads} ({width}x{height}, {frames} frames): avg {:?}, min {:?}, max {:?}, {:.1} fps",
        timer.average(),
        timer.min(),
        timer.max(),
        timer.fps()
    );
}

fn main() {
    println!("=== Render Mode Benchmarks ===\n");
    let maze = match Maze::generate(24, 24, 3, StdRng::seed_from_u64(7)) {
        Ok(maze) => maze,
        Err(err) => {
            println!("maze generation failed: {err}");
            return;
        }
    };

    for (width, height) in [(320, 240), (640, 480)] {
        println!("{width}x{height}:");
        bench_mode(&maze, RenderMode::SingleThread, 1, width, height, 60);
        for threads in [2, 4, 8] {
            bench_mode(&maze, RenderMode::Strip, threads, width, height, 60);
            bench_mode(&maze, RenderMode::Chunk, threads, width, height, 60);
        }
        println!();
    }

    println!("=== Done ===");
}
