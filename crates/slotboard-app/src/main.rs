//! Desktop entry point.

mod app;
mod ip_gate;
mod ui;

use app::SlotboardApp;

fn main() -> eframe::Result {
    env_logger::init();
    log::info!("Starting Slotboard");

    let deny = ip_gate::deny_list();
    if !deny.is_empty() {
        let resolved = ip_gate::resolve_public_ip();
        if !ip_gate::is_allowed(resolved.as_deref(), &deny) {
            log::error!("this network is not permitted to run Slotboard");
            std::process::exit(1);
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Slotboard")
            .with_inner_size([1280.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Slotboard",
        options,
        Box::new(|cc| Ok(Box::new(SlotboardApp::new(cc)))),
    )
}
