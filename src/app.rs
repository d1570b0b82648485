use std::time::Duration;

use egui::{MenuBar, RichText, ThemePreference};
use sf6_mqtt_ui::{
    ConfigPanel, Gauge, MqttConnection, PanelAction,
    status::{show_connection_banner, show_log},
};

use crate::config::ConfigFile;

const REPAINT_INTERVAL: Duration = Duration::from_millis(250);

/// We derive Deserialize/Serialize so we can persist app state on shutdown.
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct App {
    panel: ConfigPanel,
    font_size: f32,
    #[serde(skip)]
    font_size_init: bool,

    #[serde(skip)]
    connection: MqttConnection,
}

impl Default for App {
    fn default() -> Self {
        Self {
            panel: ConfigPanel::default(),
            font_size: Self::DEFAULT_FONT_SIZE,
            font_size_init: false,
            connection: MqttConnection::default(),
        }
    }
}

impl App {
    const DEFAULT_FONT_SIZE: f32 = 15.0;

    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let ConfigFile { broker, csv } = ConfigFile::load_or_default();

        // Load previous app state (if any), the password only ever comes from the config file
        if let Some(storage) = cc.storage
            && let Some(mut app) = eframe::get_value::<Self>(storage, eframe::APP_KEY)
        {
            app.panel.broker.password = broker.password;
            return app;
        }
        Self {
            panel: ConfigPanel::new(broker, csv),
            ..Default::default()
        }
    }

    fn show_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("config_panel")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.heading("Configuration");
                    ui.add_space(4.0);
                    match self.panel.ui(ui, self.connection.listener_active()) {
                        Some(PanelAction::Connect) => self
                            .connection
                            .connect(&self.panel.broker, &self.panel.csv),
                        Some(PanelAction::Disconnect) => self.connection.disconnect(),
                        None => (),
                    }
                });
            });
    }

    fn show_dashboard(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading(RichText::new("SF₆ Gas Monitoring").size(self.font_size * 1.8));
                let state = self.connection.state();
                show_connection_banner(ui, state.connection());
                ui.separator();

                ui.columns(2, |columns| {
                    columns[0].vertical_centered(|ui| {
                        ui.add(Gauge::new(state.latest_value()).width(340.0));
                    });
                    show_log(&mut columns[1], state.log_buffer());
                });
                ui.separator();

                ui.heading("Pressure history");
                self.connection.show_waiting_for_initial_data(ui);
                self.connection.show_history_plot(ui);

                ui.with_layout(egui::Layout::bottom_up(egui::Align::LEFT), |ui| {
                    egui::warn_if_debug_build(ui);
                });
            });
        });
    }
}

impl eframe::App for App {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.connection.poll();
        if self.connection.listener_active() {
            ctx.request_repaint_after(REPAINT_INTERVAL);
        }

        if !self.font_size_init {
            configure_text_styles(ctx, self.font_size);
            self.font_size_init = true;
        }

        show_top_panel(self, ctx);
        self.show_config_panel(ctx);
        self.show_dashboard(ctx);
    }
}

fn show_top_panel(app: &mut App, ctx: &egui::Context) {
    egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
        MenuBar::new().ui(ui, |ui| {
            if ui
                .button("Clear history")
                .on_hover_text("Remove all plotted readings, the log is kept")
                .clicked()
            {
                app.connection.clear_history();
            }
            ui.separator();
            ui.label("Font size");
            if ui
                .add(
                    egui::DragValue::new(&mut app.font_size)
                        .speed(0.1)
                        .range(8.0..=32.0)
                        .suffix("px"),
                )
                .changed()
            {
                configure_text_styles(ctx, app.font_size);
            }
            ui.separator();
            show_theme_toggle_buttons(ui);
        });
    });
}

fn configure_text_styles(ctx: &egui::Context, font_size: f32) {
    let mut style = (*ctx.style()).clone();
    for font_id in style.text_styles.values_mut() {
        font_id.size = font_size;
    }
    ctx.set_style(style);
}

fn show_theme_toggle_buttons(ui: &mut egui::Ui) {
    let mut theme_preference = ui.ctx().options(|opt| opt.theme_preference);

    ui.horizontal(|ui| {
        ui.selectable_value(&mut theme_preference, ThemePreference::Light, "Light");
        ui.selectable_value(&mut theme_preference, ThemePreference::Dark, "Dark");
        ui.selectable_value(&mut theme_preference, ThemePreference::System, "System");
    });

    ui.ctx().set_theme(theme_preference);
}
