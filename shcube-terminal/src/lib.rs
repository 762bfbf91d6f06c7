//! Terminal host for the shaded cube
use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, MouseEvent, MouseEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use shcube_core::{build_geometry, render_frame, FrameComposer, GeometrySink, SceneConfig};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Main application struct: owns the clock, the viewport and the event loop
pub struct TerminalApp {
    composer: FrameComposer,
    renderer: AsciiRenderer,
    index_count: usize,
    target_frame_time: Duration,
    running: bool,
    started: Instant,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(config: &SceneConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        let geometry = build_geometry();
        let mut renderer = AsciiRenderer::new(width as usize, height as usize, config.terminal.pixel_aspect);
        renderer.upload_geometry(&geometry);

        let fps = config.terminal.target_fps.max(1);
        let now = Instant::now();

        Ok(Self {
            composer: FrameComposer::from_config(config),
            renderer,
            index_count: geometry.index_count(),
            target_frame_time: Duration::from_millis(1000 / fps as u64),
            running: true,
            started: now,
            last_frame: now,
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide, EnableMouseCapture)?;
        log::info!("entered render loop at {}x{}", self.renderer.width(), self.renderer.height());

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), DisableMouseCapture, terminal::LeaveAlternateScreen, cursor::Show)?;
        log::info!("left render loop after {:.1}s", self.started.elapsed().as_secs_f32());

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            self.update()?;
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.target_frame_time {
                std::thread::sleep(self.target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent { code: KeyCode::Char('q') | KeyCode::Esc, .. }) => {
                self.running = false;
            }
            Event::Key(key) => self.key_down(key),
            Event::Mouse(mouse) if matches!(mouse.kind, MouseEventKind::Down(_)) => self.mouse_down(mouse),
            Event::Resize(width, height) => self.renderer.resize(width as usize, height as usize),
            _ => {}
        }
    }

    fn key_down(&mut self, key: KeyEvent) {
        log::trace!("key down: {:?}", key.code);
    }

    fn mouse_down(&mut self, mouse: MouseEvent) {
        log::trace!("mouse down at {},{}", mouse.column, mouse.row);
    }

    /// Poll the viewport; the aspect ratio may change between frames
    fn update(&mut self) -> io::Result<()> {
        let (width, height) = terminal::size()?;
        self.renderer.resize(width as usize, height as usize);
        Ok(())
    }

    fn render(&mut self) -> io::Result<()> {
        let elapsed = self.started.elapsed().as_secs_f64();
        let aspect = self.renderer.viewport().aspect();

        self.renderer.clear();
        render_frame(&mut self.renderer, &self.composer, elapsed, aspect, self.index_count);

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.present(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!("shcube | {:.1}s | FPS: {:.1} | Q=Quit", elapsed, self.fps)),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
