use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use aiomixer_tui::{
    ControlDescriptor, DiffRenderer, DrawStyle, Error, FrameBuffer, Mixer, MixerTransport,
    RenderConfig, Result, SnapshotTransport, TransportError, device_path, draw_mixer_select,
};
use aiomixer_tui::{Attr, Rgba};
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const HELP: &str = "q: quit  left/right, 1-9: class  up/down: control  tab: member  u: unlock";

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("aiomixer-tui: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut transport = SnapshotTransport::from_path(&cli.snapshot)?;
    let config = cli.render_config();
    info!(snapshot = ?cli.snapshot, devices = transport.device_count(), caps = ?config.caps, "starting");

    if cli.once {
        run_once(cli, &mut transport, &config)
    } else {
        run_interactive(cli, &mut transport, &config)
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Terminal control panel for audio mixer devices", long_about = None)]
struct Cli {
    /// JSON description of the mixer devices to present.
    #[arg(short, long)]
    snapshot: PathBuf,
    /// Device to open, as in /dev/mixerN.
    #[arg(short, long, default_value_t = 0)]
    device: usize,
    /// Show the device list before opening a device.
    #[arg(long)]
    select: bool,
    /// Start with level channels unlocked.
    #[arg(long)]
    unlock: bool,
    /// Never use colors.
    #[arg(long)]
    no_color: bool,
    /// Never use bold; emphasis falls back to standout.
    #[arg(long)]
    no_bold: bool,
    /// Print one frame as plain text and exit.
    #[arg(long)]
    once: bool,
}

impl Cli {
    fn render_config(&self) -> RenderConfig {
        let mut config = RenderConfig::detect();
        if self.no_color {
            config.caps.colors = false;
        }
        if self.no_bold {
            config.caps.bold = false;
        }
        config
    }
}

fn terminal_size() -> (u16, u16) {
    match terminal::size() {
        Ok(size) => size,
        Err(err) => {
            debug!(%err, "terminal size unavailable, assuming 80x24");
            (80, 24)
        }
    }
}

fn open_mixer(
    transport: &mut SnapshotTransport,
    device: usize,
    config: &RenderConfig,
) -> Result<(Mixer, usize)> {
    let handle = transport.open(&device_path(device))?;
    let identity = transport.query_identity(&handle)?;
    let classes = transport.classes(&handle);
    info!(device = %identity.name, classes = classes.len(), "opened mixer");
    Ok((Mixer::new(identity, classes, config), handle))
}

/// Redraw every surface from live values.
fn redraw(mixer: &mut Mixer, transport: &mut SnapshotTransport, handle: &usize) -> Result<()> {
    mixer.draw_header();
    mixer.draw_classbar();
    if mixer.active_class().is_some() {
        mixer.draw_class(transport, handle)?;
    }

    let help_row = mixer.screen().height().saturating_sub(1);
    let screen = mixer.screen_mut();
    screen.clear_rows(help_row, 1);
    screen.draw_text(
        0,
        help_row,
        HELP,
        Rgba::TERMINAL_DEFAULT,
        Rgba::TERMINAL_DEFAULT,
        Attr::DIM,
        None,
    );
    Ok(())
}

// =============================================================================
// One-shot
// =============================================================================

fn run_once(cli: &Cli, transport: &mut SnapshotTransport, config: &RenderConfig) -> Result<()> {
    let (width, height) = terminal_size();

    let frame = if cli.select {
        let mut screen = FrameBuffer::try_new(width, height)?;
        let count = transport.device_count();
        draw_mixer_select(&mut screen, &DrawStyle::new(config.caps), transport, count, cli.device);
        screen
    } else {
        let (mut mixer, handle) = open_mixer(transport, cli.device, config)?;
        mixer.selection.channels_unlocked = cli.unlock;
        mixer.create_widgets(width, height)?;
        redraw(&mut mixer, transport, &handle)?;
        mixer.compose()
    };

    let mut out = io::stdout().lock();
    for y in 0..frame.height() {
        writeln!(out, "{}", frame.row_text(y).trim_end())?;
    }
    out.flush()?;
    Ok(())
}

// =============================================================================
// Interactive
// =============================================================================

/// Raw mode and the alternate screen, restored on drop.
struct Session {
    renderer: DiffRenderer,
    out: io::Stdout,
}

impl Session {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut session = Self {
            renderer: DiffRenderer::new(),
            out: io::stdout(),
        };
        session.renderer.enter_fullscreen(&mut session.out)?;
        Ok(session)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        let _ = self.renderer.exit_fullscreen(&mut self.out);
        let _ = terminal::disable_raw_mode();
    }
}

fn run_interactive(
    cli: &Cli,
    transport: &mut SnapshotTransport,
    config: &RenderConfig,
) -> Result<()> {
    let mut session = Session::enter()?;

    let device = if cli.select {
        match select_device(&mut session, transport, config, cli.device)? {
            Some(device) => device,
            None => return Ok(()),
        }
    } else {
        cli.device
    };

    let (mut mixer, handle) = open_mixer(transport, device, config)?;
    mixer.selection.channels_unlocked = cli.unlock;
    let (width, height) = terminal_size();
    mixer.create_widgets(width, height)?;
    session.renderer.invalidate();

    loop {
        redraw(&mut mixer, transport, &handle)?;
        mixer.present(&mut session.renderer, &mut session.out)?;

        match event::read()? {
            Event::Resize(width, height) => {
                mixer.resize_widgets(width, height)?;
                let control = mixer.selection.control;
                select_control(&mut mixer, control);
                session.renderer.invalidate();
            }
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if !handle_key(&mut mixer, key.code) {
                    break;
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// Let the user pick a device. `None` if they quit instead.
fn select_device(
    session: &mut Session,
    transport: &mut SnapshotTransport,
    config: &RenderConfig,
    initial: usize,
) -> Result<Option<usize>> {
    let style = DrawStyle::new(config.caps);
    let count = transport.device_count();
    let mut selected = initial;

    loop {
        let (width, height) = terminal_size();
        let mut screen = FrameBuffer::try_new(width, height)?;
        let listed = draw_mixer_select(&mut screen, &style, transport, count, selected);
        if listed == 0 {
            return Err(Error::Transport(TransportError::Open {
                path: device_path(0),
                reason: "no mixer devices".to_string(),
            }));
        }
        if selected >= listed {
            selected = listed - 1;
            continue;
        }
        session.renderer.render(&screen, &mut session.out)?;

        match event::read()? {
            Event::Resize(..) => session.renderer.invalidate(),
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Up => selected = selected.saturating_sub(1),
                KeyCode::Down if selected + 1 < listed => selected += 1,
                KeyCode::Enter => return Ok(Some(selected)),
                KeyCode::Char('q') | KeyCode::Esc => return Ok(None),
                _ => {}
            },
            _ => {}
        }
    }
}

/// Apply one key press. Returns false when the user asked to quit.
fn handle_key(mixer: &mut Mixer, code: KeyCode) -> bool {
    let classes = mixer.classes.len();
    let sel = mixer.selection;

    match code {
        KeyCode::Char('q') | KeyCode::Esc => return false,
        KeyCode::Left if classes > 0 => select_class(mixer, (sel.class + classes - 1) % classes),
        KeyCode::Right if classes > 0 => select_class(mixer, (sel.class + 1) % classes),
        KeyCode::Char(c @ '1'..='9') => {
            let class = (c as u8 - b'1') as usize;
            if class < classes {
                select_class(mixer, class);
            }
        }
        KeyCode::Up => select_control(mixer, sel.control.saturating_sub(1)),
        KeyCode::Down => select_control(mixer, sel.control + 1),
        KeyCode::Tab => cycle_member(mixer),
        KeyCode::Char('u') => mixer.selection.channels_unlocked = !sel.channels_unlocked,
        _ => {}
    }
    true
}

fn select_class(mixer: &mut Mixer, class: usize) {
    mixer.selection.class = class;
    mixer.selection.control = 0;
    mixer.selection.sub = 0;
    select_control(mixer, 0);
}

/// Select control `idx` of the active class and scroll it into view.
fn select_control(mixer: &mut Mixer, idx: usize) {
    let viewport = mixer.viewport_rows();
    let Some(class) = mixer.active_class_mut() else {
        return;
    };
    if idx >= class.controls.len() {
        return;
    }
    class.scroll_to_control(idx, viewport);
    if mixer.selection.control != idx {
        mixer.selection.control = idx;
        mixer.selection.sub = 0;
    }
}

/// Move to the next set member or level channel of the selected control.
fn cycle_member(mixer: &mut Mixer) {
    let control = mixer.selection.control;
    let Some(ctrl) = mixer
        .active_class_mut()
        .and_then(|class| class.controls.get_mut(control))
    else {
        return;
    };
    let members = match &ctrl.descriptor {
        ControlDescriptor::Set { members } => members.len(),
        ControlDescriptor::Level { channels } => *channels as usize,
        ControlDescriptor::Enumeration { .. } => 0,
    };
    if members > 0 {
        ctrl.setindex = (ctrl.setindex + 1) % members;
    }
    let sub = ctrl.setindex;
    mixer.selection.sub = sub;
}
