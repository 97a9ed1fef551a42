//! Demo walkabout.
//!
//! Moves an `@` around a terrain chunk: arrow keys or hjkl to move, `q` to
//! quit immediately, `Esc` for a confirm prompt that captures all input
//! through the redirect slot until answered.

use std::io;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use crossterm::style::Color;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use termtick::map::{MapChunk, Terrain, MAP_HEIGHT, MAP_WIDTH};
use termtick::registry::handler;
use termtick::{Cell, Config, Event, KeyCode, Screen, Session};

const TICK: Duration = Duration::from_millis(30);

fn init_logging() {
    let log_path = std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(std::path::PathBuf::from)
        .map(|home| home.join(".termtick").join("walk.log"));

    let Some(log_path) = log_path else { return };
    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .ok();

    if let Some(file) = log_file {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}

/// Floor chunk with a wall ring and a few pillars to bump into.
fn build_map() -> MapChunk {
    let mut map = MapChunk::new();
    for x in 0..MAP_WIDTH {
        map.set_terrain(x, 0, Terrain::wall());
        map.set_terrain(x, MAP_HEIGHT - 1, Terrain::wall());
    }
    for y in 0..MAP_HEIGHT {
        map.set_terrain(0, y, Terrain::wall());
        map.set_terrain(MAP_WIDTH - 1, y, Terrain::wall());
    }
    for (x, y) in [(10, 5), (10, 6), (11, 5), (20, 12), (21, 12)] {
        map.set_terrain(x, y, Terrain::wall());
    }
    map
}

fn step(
    map: Arc<MapChunk>,
    x: Arc<AtomicI32>,
    y: Arc<AtomicI32>,
    dx: i32,
    dy: i32,
) -> impl Fn(&Event) + Send + Sync {
    move |_| {
        let nx = x.load(Ordering::SeqCst) + dx;
        let ny = y.load(Ordering::SeqCst) + dy;
        if map.is_passable(nx, ny) {
            x.store(nx, Ordering::SeqCst);
            y.store(ny, Ordering::SeqCst);
        }
    }
}

fn render(
    session: &mut Session,
    map: &MapChunk,
    x: i32,
    y: i32,
    prompting: bool,
) -> io::Result<()> {
    let (cols, rows) = Screen::size()?;
    let Some(screen) = session.screen() else {
        return Ok(());
    };

    screen.clear()?;
    map.draw(screen, cols, rows.saturating_sub(1));
    if x >= 0 && y >= 0 {
        screen.set_cell(x as u16, y as u16, Cell::with_fg('@', Color::Yellow));
    }

    let status = if prompting {
        "really quit? (y/n)"
    } else {
        "arrows/hjkl: move | q: quit | Esc: quit prompt"
    };
    screen.print(0, rows.saturating_sub(1), Color::Black, Color::Grey, status);
    screen.flush()
}

fn main() -> anyhow::Result<()> {
    init_logging();
    info!("walk demo starting");

    let mut config = Config::load();
    if config.title.is_none() {
        config.title = Some("termtick walk".to_string());
    }

    let mut session = Session::new();
    session
        .start(&config)
        .context("failed to acquire the terminal")?;
    session.set_resize_hook(|cols, rows| info!("resized to {}x{}", cols, rows));

    let map = Arc::new(build_map());
    let player_x = Arc::new(AtomicI32::new(4));
    let player_y = Arc::new(AtomicI32::new(4));
    let quit = Arc::new(AtomicBool::new(false));
    let prompting = Arc::new(AtomicBool::new(false));

    let moves = [
        (KeyCode::Left, 'h', -1, 0),
        (KeyCode::Down, 'j', 0, 1),
        (KeyCode::Up, 'k', 0, -1),
        (KeyCode::Right, 'l', 1, 0),
    ];
    for (key, ch, dx, dy) in moves {
        session.on_key(
            key,
            step(map.clone(), player_x.clone(), player_y.clone(), dx, dy),
        );
        session.on_char(
            ch,
            step(map.clone(), player_x.clone(), player_y.clone(), dx, dy),
        );
    }

    let flag = quit.clone();
    session.on_char('q', move |_| flag.store(true, Ordering::SeqCst));

    // Esc installs a redirect that owns all input until the prompt is
    // answered, then uninstalls itself.
    let registry = session.registry();
    let flag = quit.clone();
    let asking = prompting.clone();
    session.on_key(KeyCode::Esc, move |_| {
        asking.store(true, Ordering::SeqCst);
        let registry_inner = registry.clone();
        let flag = flag.clone();
        let asking = asking.clone();
        registry.set_redirect(Some(handler(move |event| {
            if let Event::Key(press) = event {
                if press.code == KeyCode::Char('y') {
                    flag.store(true, Ordering::SeqCst);
                }
            }
            asking.store(false, Ordering::SeqCst);
            registry_inner.set_redirect(None);
        })));
    });

    while !quit.load(Ordering::SeqCst) {
        if let Err(e) = session.dispatch_input() {
            // One bad event should not end an interactive session.
            error!("input error: {}", e);
        }
        render(
            &mut session,
            &map,
            player_x.load(Ordering::SeqCst),
            player_y.load(Ordering::SeqCst),
            prompting.load(Ordering::SeqCst),
        )?;
        thread::sleep(TICK);
    }

    session.stop();
    info!("walk demo exiting");
    Ok(())
}
