//! Propdeck - inspector demo
//!
//! Shows a sample `Player` record with every bundled decorator attached.
//! Set `PROPDECK_CONFIG` to a JSON file to override layout settings.

use std::path::PathBuf;
use std::sync::Arc;

use eframe::egui;
use log::info;

use propdeck::constants::app;
use propdeck::decorators::{
    reference, reference_type, AngleToRad, ArrayLabel, BackgroundColor, Button, ColorPreset, HideIf, Maximum,
    RemoveFoldout,
};
use propdeck::{FieldMeta, Inspector, InspectorConfig, PassReport, Schema, TypeKey, TypeRegistry, Value, ValueTree};

fn vec2_value(x: f64, y: f64) -> Value {
    Value::record(TypeKey::named("Vec2"), vec![("x", Value::Float(x)), ("y", Value::Float(y))])
}

fn waypoint(name: &str, x: f64, y: f64) -> Value {
    Value::record(
        TypeKey::named("Waypoint"),
        vec![("name", Value::String(name.to_string())), ("position", vec2_value(x, y))],
    )
}

fn circle() -> Value {
    Value::record(TypeKey::named("Circle"), vec![("radius", Value::Float(0.5))])
}

fn square() -> Value {
    Value::record(TypeKey::named("Square"), vec![("side", Value::Float(1.0))])
}

fn shape_types() -> TypeRegistry {
    let mut types = TypeRegistry::new();
    types
        .register_subtype(TypeKey::named("Shape"), TypeKey::named("Circle"), circle)
        .register_subtype(TypeKey::named("Shape"), TypeKey::named("Square"), square);
    types
}

fn player_schema() -> Schema {
    let shape = TypeKey::named("Shape");
    let mut schema = Schema::new();
    schema.declare(
        "Player",
        vec![
            FieldMeta::new("name", TypeKey::string())
                .with_annotation(Arc::new(BackgroundColor::preset(ColorPreset::Cyan, 0.35))),
            FieldMeta::new("max_speed", TypeKey::float()).with_annotation(Arc::new(Maximum::float(50.0))),
            FieldMeta::new("speed", TypeKey::float())
                .with_annotation(Arc::new(Maximum::path("max_speed")))
                .with_annotation(Arc::new(Button::new("Stop", "stop"))),
            FieldMeta::new("heading_rad", TypeKey::float()).with_annotation(Arc::new(AngleToRad)),
            FieldMeta::new("invisible", TypeKey::bool()),
            FieldMeta::new("secret", TypeKey::string()).with_annotation(Arc::new(HideIf::new("invisible"))),
            FieldMeta::new("spawn", TypeKey::named("Vec2")).with_annotation(Arc::new(RemoveFoldout)),
            FieldMeta::new("route", TypeKey::list(TypeKey::named("Waypoint")))
                .with_element_annotation(Arc::new(ArrayLabel::named())),
            FieldMeta::new("hitbox", reference_type(shape.clone(), shape)),
            FieldMeta::new("score", TypeKey::int())
                .with_annotation(Arc::new(Button::for_method("reset_score").hide_property_field().after())),
        ],
    );
    schema
}

fn player_tree() -> ValueTree {
    let shape = TypeKey::named("Shape");
    let root = Value::record(
        TypeKey::named("Player"),
        vec![
            ("name", Value::String("Ada".into())),
            ("max_speed", Value::Float(12.0)),
            ("speed", Value::Float(8.0)),
            ("heading_rad", Value::Float(std::f64::consts::FRAC_PI_2)),
            ("invisible", Value::Bool(false)),
            ("secret", Value::String("xyzzy".into())),
            ("spawn", vec2_value(0.0, 0.0)),
            (
                "route",
                Value::list(
                    TypeKey::named("Waypoint"),
                    vec![waypoint("Gate", 4.0, 2.0), waypoint("Tower", 9.0, -3.0)],
                ),
            ),
            ("hitbox", reference(shape.clone(), shape, circle())),
            ("score", Value::Int(1200)),
        ],
    );

    let mut tree = ValueTree::new(root, Arc::new(player_schema()));
    tree.register_method("Player", "stop", |player| {
        let speed = player.field_mut("speed").ok_or("player has no speed")?;
        *speed = Value::Float(0.0);
        Ok(())
    });
    tree.register_method("Player", "reset_score", |player| {
        let score = player.field_mut("score").ok_or("player has no score")?;
        *score = Value::Int(0);
        Ok(())
    });
    tree.set_commit_hook(|path, value| {
        info!("Committed {} = {:?}", path, value);
        Ok(())
    });
    tree
}

/// Demo window holding one inspected object
struct InspectorDemo {
    inspector: Inspector,
    tree: ValueTree,
    last_report: Option<PassReport>,
}

impl InspectorDemo {
    fn new(config: InspectorConfig) -> Self {
        Self {
            inspector: Inspector::with_config(config, Arc::new(shape_types())),
            tree: player_tree(),
            last_report: None,
        }
    }
}

impl eframe::App for InspectorDemo {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Player");
            ui.separator();
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.last_report = Some(self.inspector.show(ui, &mut self.tree));
            });
            if let Some(report) = &self.last_report {
                for diagnostic in &report.diagnostics {
                    ui.colored_label(egui::Color32::LIGHT_RED, diagnostic.to_string());
                }
            }
        });
    }
}

fn main() -> Result<(), eframe::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::var_os(app::CONFIG_ENV_VAR).map(PathBuf::from);
    let config = InspectorConfig::load_or_default(config_path.as_deref());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size(app::DEFAULT_WINDOW_SIZE),
        ..Default::default()
    };

    eframe::run_native(
        "Propdeck",
        options,
        Box::new(|_cc| Ok(Box::new(InspectorDemo::new(config)))),
    )
}
