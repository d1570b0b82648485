use egui_kittest::{Harness, kittest::Queryable as _};

fn get_harness() -> Harness<'static, sf6_monitor::App> {
    Harness::new_eframe(|cc| sf6_monitor::App::new(cc))
}

#[test]
fn renders_banner_and_config_form() {
    let mut harness = get_harness();
    harness.run();

    harness.get_by_label("Not connected");
    harness.get_by_label("Configuration");
    harness.get_by_label("Connect");
    harness.get_by_label("Disconnect");
    harness.get_by_label("Log readings to CSV");
}

#[test]
fn clear_history_button_is_available() {
    let mut harness = get_harness();
    harness.run();

    harness.get_by_label("Clear history").click();
    harness.run();
    harness.get_by_label("Not connected");
}
