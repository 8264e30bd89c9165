//! Application state and the per-frame update loop.

use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use kurbo::Point;

use slotboard_core::storage::{self, FileStore, MemoryStore, PersistManager, Store};
use slotboard_core::sync::{preflight, run_sync, BatchOutcome, SyncState};
use slotboard_core::warehouse::HttpLocationCheck;
use slotboard_core::{
    DoubleClickAction, Editor, Item, ItemId, Modifiers, PointerButton, ResultCache, Site,
    SyncConfig, SyncError, ToolKind,
};
use slotboard_render::{render, FrameState};

use crate::ui;

/// Messages from the sync worker thread.
pub enum SyncMessage {
    Batch(BatchOutcome),
    Done,
}

/// Which modal dialog is open, with its draft input.
#[derive(Default)]
pub enum Modal {
    #[default]
    None,
    AddLocation {
        name: String,
    },
    AddText {
        content: String,
    },
    BatchAdd {
        base_name: String,
        from: String,
        to: String,
        error: Option<String>,
    },
    EditText {
        id: ItemId,
        content: String,
    },
}

pub struct SlotboardApp {
    pub editor: Editor,
    pub config: SyncConfig,
    pub cache: ResultCache,
    pub sync_state: SyncState,
    pub modal: Modal,
    /// Location shown in the right-hand detail panel.
    pub detail: Option<ItemId>,
    /// Draft name while renaming in the detail panel.
    pub detail_name: String,
    pub settings_open: bool,
    pub settings_draft: SyncConfig,
    pub sites: Vec<Site>,
    persist: PersistManager,
    sync_rx: Option<mpsc::Receiver<SyncMessage>>,
    site_rx: Option<mpsc::Receiver<Vec<Site>>>,
    hovered: Option<ItemId>,
}

impl SlotboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let store: Arc<dyn Store> = match FileStore::default_location() {
            Ok(store) => Arc::new(store),
            Err(e) => {
                log::warn!("falling back to in-memory storage: {e}");
                Arc::new(MemoryStore::new())
            }
        };
        let document = storage::load_document(store.as_ref());
        let camera = storage::load_camera(store.as_ref());
        let config = SyncConfig::load(store.as_ref());
        log::info!("loaded {} items", document.len());
        Self {
            editor: Editor::new(document, camera),
            settings_draft: config.clone(),
            config,
            cache: ResultCache::new(),
            sync_state: SyncState::default(),
            modal: Modal::None,
            detail: None,
            detail_name: String::new(),
            settings_open: false,
            sites: Vec::new(),
            persist: PersistManager::new(store),
            sync_rx: None,
            site_rx: None,
            hovered: None,
        }
    }

    /// Kick off a sync pass on a worker thread. Opens settings instead
    /// when configuration is incomplete.
    pub fn start_sync(&mut self) {
        let targets = match preflight(&self.config, &self.editor.document) {
            Ok(targets) => targets,
            Err(SyncError::MissingConfig(field)) => {
                log::info!("sync blocked, missing {field}");
                self.settings_open = true;
                return;
            }
            Err(e) => {
                log::info!("sync skipped: {e}");
                return;
            }
        };
        if self.sync_state.start(targets.len()).is_err() {
            return;
        }
        // Whole-pass undo point, taken before any server call.
        self.editor.history.push(self.editor.document.clone());

        let config = self.config.clone();
        let (tx, rx) = mpsc::channel();
        self.sync_rx = Some(rx);
        std::thread::spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    log::error!("failed to start sync runtime: {e}");
                    let _ = tx.send(SyncMessage::Done);
                    return;
                }
            };
            let checker = HttpLocationCheck::new(config);
            runtime.block_on(run_sync(&targets, &checker, |outcome| {
                let _ = tx.send(SyncMessage::Batch(outcome));
            }));
            let _ = tx.send(SyncMessage::Done);
        });
    }

    /// Fetch the site list for the settings window, off-thread.
    pub fn start_site_fetch(&mut self) {
        let server_url = self.settings_draft.server_url.clone();
        let (tx, rx) = mpsc::channel();
        self.site_rx = Some(rx);
        std::thread::spawn(move || {
            let sites = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt.block_on(slotboard_core::warehouse::list_sites(&server_url)),
                Err(_) => Vec::new(),
            };
            let _ = tx.send(sites);
        });
    }

    fn poll_workers(&mut self) {
        if let Some(rx) = self.sync_rx.take() {
            let mut done = false;
            loop {
                match rx.try_recv() {
                    Ok(SyncMessage::Batch(outcome)) => {
                        self.editor.document.apply_statuses(&outcome.statuses);
                        for (id, items) in outcome.results {
                            self.cache.insert(id, items);
                        }
                        self.sync_state.advance(outcome.checked);
                        self.editor.mark_dirty();
                    }
                    Ok(SyncMessage::Done) => {
                        done = true;
                        break;
                    }
                    Err(mpsc::TryRecvError::Empty) => break,
                    // A dead worker still ends the pass.
                    Err(mpsc::TryRecvError::Disconnected) => {
                        done = true;
                        break;
                    }
                }
            }
            if done {
                self.sync_state.finish();
            } else {
                self.sync_rx = Some(rx);
            }
        }
        if let Some(rx) = self.site_rx.take() {
            match rx.try_recv() {
                Ok(sites) => self.sites = sites,
                Err(mpsc::TryRecvError::Empty) => self.site_rx = Some(rx),
                Err(mpsc::TryRecvError::Disconnected) => {}
            }
        }
    }

    pub fn apply_config_draft(&mut self) {
        self.config = self.settings_draft.clone();
        self.config.save(self.persist.store().as_ref());
    }

    /// Open the detail panel for a location.
    pub fn open_detail(&mut self, id: ItemId) {
        if let Some(Item::Location(loc)) = self.editor.document.get(id) {
            self.detail_name = loc.name.clone();
            self.detail = Some(id);
        }
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
        self.detail_name.clear();
    }

    fn handle_canvas_input(&mut self, ctx: &egui::Context, response: &egui::Response) {
        let mods = ctx.input(|i| Modifiers {
            shift: i.modifiers.shift,
            ctrl: i.modifiers.ctrl,
        });
        let pointer = ctx.input(|i| i.pointer.clone());
        let Some(pos) = pointer.hover_pos().or(pointer.interact_pos()) else {
            self.hovered = None;
            return;
        };
        let screen = Point::new(pos.x as f64, pos.y as f64);

        if response.double_clicked() {
            match self.editor.double_click(screen) {
                Some(DoubleClickAction::OpenLocation(id)) => self.open_detail(id),
                Some(DoubleClickAction::EditText(id)) => {
                    if let Some(Item::Text(text)) = self.editor.document.get(id) {
                        self.modal = Modal::EditText { id, content: text.content.clone() };
                    }
                }
                None => {}
            }
        } else if response.hovered() {
            if pointer.button_pressed(egui::PointerButton::Primary) {
                self.editor.pointer_down(screen, PointerButton::Primary, mods);
            }
            if pointer.button_pressed(egui::PointerButton::Middle) {
                self.editor.pointer_down(screen, PointerButton::Middle, mods);
            }
        }

        if pointer.is_moving() || pointer.any_down() {
            self.editor.pointer_move(screen);
        }
        if pointer.button_released(egui::PointerButton::Primary)
            || pointer.button_released(egui::PointerButton::Middle)
        {
            self.editor.pointer_up();
        }

        // Wheel zoom, anchored at the cursor.
        let (scroll, ctrl) = ctx.input(|i| (i.raw_scroll_delta.y, i.modifiers.ctrl));
        if response.hovered() && scroll != 0.0 {
            self.editor.wheel_zoom(screen, scroll as f64, ctrl);
        }

        // Hover target for the stock tooltip, only while idle.
        self.hovered = if matches!(self.editor.state(), slotboard_core::EditorState::Idle)
            && response.hovered()
        {
            let world = self.editor.camera.to_world(screen);
            slotboard_core::hit::hit_test(&self.editor.document, world, self.editor.camera.z)
                .and_then(|item| item.as_location())
                .map(|loc| loc.id)
        } else {
            None
        };
    }

    fn handle_keyboard(&mut self, ctx: &egui::Context) {
        let keys = ctx.input(|i| KeyPresses {
            undo: i.modifiers.command && i.key_pressed(egui::Key::Z),
            delete: i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace),
            select_all: i.modifiers.command && i.key_pressed(egui::Key::A),
            escape: i.key_pressed(egui::Key::Escape),
            space: i.key_down(egui::Key::Space),
        });
        let keys = scope_to_focus(ctx.wants_keyboard_input(), keys);
        self.editor.set_space_held(keys.space);
        if keys.undo {
            self.editor.undo();
        }
        if keys.delete {
            self.editor.delete_selection();
            if let Some(id) = self.detail
                && !self.editor.document.contains(id)
            {
                self.close_detail();
            }
        }
        if keys.select_all {
            self.editor.select_all();
        }
        if keys.escape {
            self.editor.escape();
            self.modal = Modal::None;
            self.settings_open = false;
            self.close_detail();
        }
    }

    fn draw_canvas(&mut self, ui: &mut egui::Ui) {
        let (rect, response) =
            ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
        self.handle_canvas_input(ui.ctx(), &response);

        let hover = self.hovered.and_then(|id| {
            let loc = self.editor.document.get(id)?.as_location()?;
            let items = self.cache.get(&id)?;
            Some((loc, items.as_slice()))
        });
        let frame = FrameState {
            document: &self.editor.document,
            selection: &self.editor.selection,
            camera: &self.editor.camera,
            marquee: self.editor.marquee_rect(),
            line_anchor: self.editor.line_anchor(),
            hover,
        };
        render(&ui.painter_at(rect), rect, &frame);
    }

    /// World point where newly added items land.
    pub fn spawn_point(&self, ctx: &egui::Context) -> Point {
        let rect = ctx.screen_rect();
        self.editor.camera.to_world(Point::new(
            rect.center().x as f64,
            rect.center().y as f64,
        ))
    }

    pub fn tool_button(&mut self, ui: &mut egui::Ui, tool: ToolKind, label: &str) {
        if ui.selectable_label(self.editor.tool() == tool, label).clicked() {
            self.editor.set_tool(tool);
        }
    }
}

impl eframe::App for SlotboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_workers();

        ui::toolbar(self, ctx);
        ui::status_bar(self, ctx);
        ui::detail_panel(self, ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.draw_canvas(ui);
            });

        self.handle_keyboard(ctx);
        ui::modals(self, ctx);
        ui::settings_window(self, ctx);

        // Debounced persistence.
        let now = Instant::now();
        if self.editor.take_dirty() {
            self.persist.mark_dirty(now);
        }
        self.persist
            .maybe_save(now, &self.editor.document, &self.editor.camera);

        if self.sync_state.is_running() || self.persist.is_dirty() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.persist.flush(&self.editor.document, &self.editor.camera);
    }
}

/// Global shortcuts sampled from one frame's input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct KeyPresses {
    undo: bool,
    delete: bool,
    select_all: bool,
    escape: bool,
    space: bool,
}

/// While a text field has focus, only Delete and the space-pan flag are
/// suppressed. Escape, undo, and select-all stay global, so Escape
/// closes an open modal on the first press.
fn scope_to_focus(typing: bool, keys: KeyPresses) -> KeyPresses {
    KeyPresses {
        delete: keys.delete && !typing,
        space: keys.space && !typing,
        ..keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_focus_scopes_delete_and_space_only() {
        let all = KeyPresses {
            undo: true,
            delete: true,
            select_all: true,
            escape: true,
            space: true,
        };
        let typing = scope_to_focus(true, all);
        assert!(typing.undo && typing.select_all && typing.escape);
        assert!(!typing.delete && !typing.space);
        assert_eq!(scope_to_focus(false, all), all);
    }
}
