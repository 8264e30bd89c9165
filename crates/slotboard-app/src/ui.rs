//! Window chrome: toolbar, status bar, modals, settings, detail panel.

use slotboard_core::{BatchRange, Item, Status, StatusPolicy, ToolKind};

use crate::app::{Modal, SlotboardApp};

pub fn toolbar(app: &mut SlotboardApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            app.tool_button(ui, ToolKind::Select, "Select");
            app.tool_button(ui, ToolKind::Hand, "Hand");
            app.tool_button(ui, ToolKind::Line, "Line");
            ui.separator();

            if ui.button("Add Location").clicked() {
                app.modal = Modal::AddLocation { name: String::new() };
            }
            if ui.button("Add Text").clicked() {
                app.modal = Modal::AddText { content: String::new() };
            }
            if ui.button("Batch Add").clicked() {
                app.modal = Modal::BatchAdd {
                    base_name: String::new(),
                    from: String::new(),
                    to: String::new(),
                    error: None,
                };
            }
            ui.separator();

            if ui.button("Undo").clicked() {
                app.editor.undo();
            }
            if ui.button("Reset View").clicked() {
                app.editor.reset_view();
            }
            ui.separator();

            let syncing = app.sync_state.is_running();
            if syncing {
                let (checked, total) = app.sync_state.progress();
                ui.add_enabled(false, egui::Button::new(format!("Syncing {checked}/{total}")));
            } else if ui.button("Sync").clicked() {
                app.start_sync();
            }

            if ui.button("Settings").clicked() {
                app.settings_draft = app.config.clone();
                app.settings_open = true;
            }
        });
    });
}

pub fn status_bar(app: &mut SlotboardApp, ctx: &egui::Context) {
    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.label(format!("{} items", app.editor.document.len()));
            ui.separator();
            ui.label(format!("{} selected", app.editor.selection.len()));
            ui.separator();
            ui.label(format!("zoom {:.0}%", app.editor.camera.z * 100.0));
            if app.sync_state.is_running() {
                ui.separator();
                let (checked, total) = app.sync_state.progress();
                ui.label(format!("syncing {checked}/{total}"));
            }
        });
    });
}

pub fn detail_panel(app: &mut SlotboardApp, ctx: &egui::Context) {
    let Some(id) = app.detail else { return };
    let Some(Item::Location(loc)) = app.editor.document.get(id) else {
        // The location was deleted out from under the panel.
        app.close_detail();
        return;
    };
    let status = loc.status;
    let rows = app.cache.get(&id).cloned().unwrap_or_default();

    let mut close = false;
    let mut rename = false;
    let mut delete = false;
    egui::SidePanel::right("detail_panel")
        .default_width(260.0)
        .show(ctx, |ui| {
            ui.heading("Location");
            ui.horizontal(|ui| {
                ui.text_edit_singleline(&mut app.detail_name);
                rename = ui.button("Rename").clicked();
            });
            ui.label(format!("Status: {}", status_label(status)));
            ui.separator();
            ui.label("Stock");
            if rows.is_empty() {
                ui.weak("no cached results, run a sync");
            } else {
                egui::Grid::new("stock_grid").striped(true).show(ui, |ui| {
                    ui.strong("Tag");
                    ui.strong("Type");
                    ui.strong("Stock No");
                    ui.end_row();
                    for item in &rows {
                        ui.label(item.tag.to_string());
                        ui.label(&item.item_type);
                        ui.label(&item.vstock_no);
                        ui.end_row();
                    }
                });
            }
            ui.separator();
            ui.horizontal(|ui| {
                delete = ui.button("Delete").clicked();
                close = ui.button("Close").clicked();
            });
        });

    if rename {
        let name = app.detail_name.clone();
        app.editor.rename_location(id, &name);
    }
    if delete {
        app.editor.selection.set(id);
        app.editor.delete_selection();
        app.close_detail();
    }
    if close {
        app.close_detail();
    }
}

pub fn modals(app: &mut SlotboardApp, ctx: &egui::Context) {
    let modal = std::mem::take(&mut app.modal);
    app.modal = match modal {
        Modal::None => Modal::None,
        Modal::AddLocation { mut name } => {
            let mut action = ModalAction::Keep;
            egui::Window::new("Add Location")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.text_edit_singleline(&mut name);
                    action = confirm_row(ui, !name.trim().is_empty());
                });
            match action {
                ModalAction::Confirm => {
                    let at = app.spawn_point(ctx);
                    app.editor.add_location(name.trim(), at);
                    Modal::None
                }
                ModalAction::Cancel => Modal::None,
                ModalAction::Keep => Modal::AddLocation { name },
            }
        }
        Modal::AddText { mut content } => {
            let mut action = ModalAction::Keep;
            egui::Window::new("Add Text")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.text_edit_singleline(&mut content);
                    action = confirm_row(ui, !content.trim().is_empty());
                });
            match action {
                ModalAction::Confirm => {
                    let at = app.spawn_point(ctx);
                    app.editor.add_text(content.trim(), at);
                    Modal::None
                }
                ModalAction::Cancel => Modal::None,
                ModalAction::Keep => Modal::AddText { content },
            }
        }
        Modal::BatchAdd { mut base_name, mut from, mut to, mut error } => {
            let mut action = ModalAction::Keep;
            egui::Window::new("Batch Add Locations")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        ui.label("Base name");
                        ui.text_edit_singleline(&mut base_name);
                    });
                    ui.horizontal(|ui| {
                        ui.label("From");
                        ui.text_edit_singleline(&mut from);
                        ui.label("To");
                        ui.text_edit_singleline(&mut to);
                    });
                    ui.weak("Ranges are numeric (1..24) or single letters (A..F)");
                    if let Some(error) = &error {
                        ui.colored_label(egui::Color32::LIGHT_RED, error);
                    }
                    action = confirm_row(ui, true);
                });
            match action {
                ModalAction::Confirm => {
                    let result = BatchRange::parse(&from, &to).and_then(|range| {
                        let at = app.spawn_point(ctx);
                        app.editor.batch_add_locations(&base_name, &range, at)
                    });
                    match result {
                        Ok(_) => Modal::None,
                        Err(e) => {
                            error = Some(e.to_string());
                            Modal::BatchAdd { base_name, from, to, error }
                        }
                    }
                }
                ModalAction::Cancel => Modal::None,
                ModalAction::Keep => Modal::BatchAdd { base_name, from, to, error },
            }
        }
        Modal::EditText { id, mut content } => {
            let mut action = ModalAction::Keep;
            egui::Window::new("Edit Text")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.text_edit_singleline(&mut content);
                    action = confirm_row(ui, !content.trim().is_empty());
                });
            match action {
                ModalAction::Confirm => {
                    app.editor.edit_text(id, content.trim());
                    Modal::None
                }
                ModalAction::Cancel => Modal::None,
                ModalAction::Keep => Modal::EditText { id, content },
            }
        }
    };
}

pub fn settings_window(app: &mut SlotboardApp, ctx: &egui::Context) {
    if !app.settings_open {
        return;
    }
    let mut open = true;
    let mut save = false;
    let mut fetch_sites = false;
    egui::Window::new("Settings")
        .open(&mut open)
        .collapsible(false)
        .show(ctx, |ui| {
            egui::Grid::new("settings_grid").num_columns(2).show(ui, |ui| {
                ui.label("Server URL");
                ui.text_edit_singleline(&mut app.settings_draft.server_url);
                ui.end_row();
                ui.label("Location parameter");
                ui.text_edit_singleline(&mut app.settings_draft.location_param);
                ui.end_row();
                ui.label("Username");
                ui.text_edit_singleline(&mut app.settings_draft.username);
                ui.end_row();
                ui.label("Password");
                ui.add(egui::TextEdit::singleline(&mut app.settings_draft.password).password(true));
                ui.end_row();
                ui.label("Status policy");
                egui::ComboBox::from_id_salt("policy")
                    .selected_text(policy_label(app.settings_draft.policy))
                    .show_ui(ui, |ui| {
                        for policy in [StatusPolicy::AnyItem, StatusPolicy::DoorTag] {
                            ui.selectable_value(
                                &mut app.settings_draft.policy,
                                policy,
                                policy_label(policy),
                            );
                        }
                    });
                ui.end_row();
                ui.label("Site");
                ui.horizontal(|ui| {
                    let selected = app
                        .settings_draft
                        .site
                        .as_ref()
                        .map(|s| s.short_code.clone())
                        .unwrap_or_else(|| "none".to_string());
                    egui::ComboBox::from_id_salt("site")
                        .selected_text(selected)
                        .show_ui(ui, |ui| {
                            ui.selectable_value(&mut app.settings_draft.site, None, "none");
                            for site in &app.sites {
                                ui.selectable_value(
                                    &mut app.settings_draft.site,
                                    Some(site.clone()),
                                    format!("{} ({})", site.short_code, site.yard_name),
                                );
                            }
                        });
                    fetch_sites = ui.button("Load sites").clicked();
                });
                ui.end_row();
            });
            ui.separator();
            save = ui.button("Save").clicked();
        });

    if fetch_sites {
        app.start_site_fetch();
    }
    if save {
        app.apply_config_draft();
        app.settings_open = false;
    } else {
        app.settings_open = open;
    }
}

enum ModalAction {
    Keep,
    Confirm,
    Cancel,
}

/// Standard OK/Cancel row; OK is disabled until the input is valid.
fn confirm_row(ui: &mut egui::Ui, valid: bool) -> ModalAction {
    let mut action = ModalAction::Keep;
    ui.horizontal(|ui| {
        if ui.add_enabled(valid, egui::Button::new("OK")).clicked() {
            action = ModalAction::Confirm;
        }
        if ui.button("Cancel").clicked() {
            action = ModalAction::Cancel;
        }
    });
    action
}

fn status_label(status: Status) -> &'static str {
    match status {
        Status::Green => "green",
        Status::Yellow => "yellow",
        Status::Red => "red",
    }
}

fn policy_label(policy: StatusPolicy) -> &'static str {
    match policy {
        StatusPolicy::AnyItem => "Any item present",
        StatusPolicy::DoorTag => "Door tag present",
    }
}
