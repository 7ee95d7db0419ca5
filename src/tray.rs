//! System tray via D-Bus StatusNotifierItem (ksni)
//!
//! The tray lives on its own thread with a current-thread tokio runtime. Menu
//! actions never touch widget state directly: they are forwarded to the
//! control thread as `TrayCommand`s, followed by a repaint request so the
//! settings loop picks them up even while its window is hidden.

use anyhow::{Context, Result, anyhow};
use std::io::Cursor;
use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::Duration;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{error, info};

use crate::constants::tray;

/// Actions requested from outside the settings window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayCommand {
    ShowSettings,
    Relaunch,
    CloseAll,
    TogglePin,
    Quit,
}

/// Forwards commands to the control thread and wakes it up
#[derive(Clone)]
pub struct CommandSender {
    tx: Sender<TrayCommand>,
    repaint: egui::Context,
}

impl CommandSender {
    pub fn new(tx: Sender<TrayCommand>, repaint: egui::Context) -> Self {
        Self { tx, repaint }
    }

    pub fn send(&self, command: TrayCommand) {
        if self.tx.send(command).is_err() {
            error!(command = ?command, "Control thread is gone, dropping tray command");
            return;
        }
        self.repaint.request_repaint();
    }
}

struct WidgetTray {
    commands: CommandSender,
    global_pin: bool,
    icon: Option<ksni::Icon>,
}

impl WidgetTray {
    fn item(label: &str, command: TrayCommand) -> ksni::MenuItem<Self> {
        ksni::menu::StandardItem {
            label: label.to_string(),
            activate: Box::new(move |tray: &mut Self| tray.commands.send(command)),
            ..Default::default()
        }
        .into()
    }
}

impl ksni::Tray for WidgetTray {
    fn id(&self) -> String {
        tray::ID.to_string()
    }

    fn title(&self) -> String {
        tray::TITLE.to_string()
    }

    fn icon_pixmap(&self) -> Vec<ksni::Icon> {
        self.icon.iter().cloned().collect()
    }

    fn activate(&mut self, _x: i32, _y: i32) {
        self.commands.send(TrayCommand::ShowSettings);
    }

    fn menu(&self) -> Vec<ksni::MenuItem<Self>> {
        let pin_label = if self.global_pin { tray::UNPIN_ALL } else { tray::PIN_ALL };
        vec![
            Self::item(tray::SHOW_SETTINGS, TrayCommand::ShowSettings),
            Self::item(tray::RELAUNCH, TrayCommand::Relaunch),
            Self::item(tray::CLOSE_ALL, TrayCommand::CloseAll),
            Self::item(pin_label, TrayCommand::TogglePin),
            ksni::MenuItem::Separator,
            Self::item(tray::QUIT, TrayCommand::Quit),
        ]
    }
}

/// Control-thread side of a running tray
pub struct TrayHandle {
    pin_updates: UnboundedSender<bool>,
}

impl TrayHandle {
    /// Refresh the pin menu label
    pub fn set_global_pin(&self, enabled: bool) {
        if self.pin_updates.send(enabled).is_err() {
            error!("Tray thread has stopped, cannot update pin label");
        }
    }
}

/// Start the tray thread; fails when no StatusNotifier host answers in time
pub fn spawn_tray(commands: CommandSender, global_pin: bool) -> Result<TrayHandle> {
    let icon = load_tray_icon()
        .inspect_err(|e| error!(error = ?e, "Failed to load tray icon, using none"))
        .ok();
    let (pin_tx, pin_rx) = unbounded_channel();
    let (ready_tx, ready_rx) = mpsc::channel();

    let tray = WidgetTray {
        commands,
        global_pin,
        icon,
    };

    thread::Builder::new()
        .name("tray".to_string())
        .spawn(move || {
            if let Err(e) = run_tray(tray, pin_rx, ready_tx) {
                error!(error = ?e, "Tray thread stopped");
            }
        })
        .context("Failed to spawn tray thread")?;

    match ready_rx.recv_timeout(Duration::from_millis(2000)) {
        Ok(Ok(())) => {
            info!("Tray icon initialized");
            Ok(TrayHandle { pin_updates: pin_tx })
        }
        Ok(Err(reason)) => Err(anyhow!(reason)),
        Err(_) => Err(anyhow!("Timed out waiting for tray registration")),
    }
}

fn run_tray(
    tray: WidgetTray,
    mut pin_rx: UnboundedReceiver<bool>,
    ready_tx: Sender<std::result::Result<(), String>>,
) -> Result<()> {
    use ksni::TrayMethods;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build tray runtime")?;

    runtime.block_on(async move {
        let handle = match tray.spawn().await {
            Ok(handle) => {
                let _ = ready_tx.send(Ok(()));
                handle
            }
            Err(e) => {
                let _ = ready_tx.send(Err(format!("{e}")));
                return Err(anyhow!("Failed to register tray: {e}"));
            }
        };

        while let Some(enabled) = pin_rx.recv().await {
            handle
                .update(|tray: &mut WidgetTray| tray.global_pin = enabled)
                .await;
        }
        Ok(())
    })
}

fn load_tray_icon() -> Result<ksni::Icon> {
    let icon_bytes = include_bytes!("../assets/tray-icon.png");
    let decoder = png::Decoder::new(Cursor::new(&icon_bytes[..]));
    let mut reader = decoder.read_info().context("Failed to read tray icon header")?;
    let size = reader
        .output_buffer_size()
        .context("Tray icon too large to decode")?;
    let mut buf = vec![0; size];
    let info = reader.next_frame(&mut buf).context("Failed to decode tray icon")?;
    let pixels = &buf[..info.buffer_size()];

    let rgba = match info.color_type {
        png::ColorType::Rgba => pixels.to_vec(),
        png::ColorType::Rgb => pixels
            .chunks_exact(3)
            .flat_map(|px| [px[0], px[1], px[2], 0xFF])
            .collect(),
        other => {
            return Err(anyhow!(
                "Unsupported tray icon color type {:?} (expected RGB or RGBA)",
                other
            ));
        }
    };

    Ok(ksni::Icon {
        width: info.width as i32,
        height: info.height as i32,
        data: rgba_to_argb(&rgba),
    })
}

/// StatusNotifier pixmaps are ARGB32 in network byte order
fn rgba_to_argb(rgba: &[u8]) -> Vec<u8> {
    rgba.chunks_exact(4)
        .flat_map(|px| [px[3], px[0], px[1], px[2]])
        .collect()
}
