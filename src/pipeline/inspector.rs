//! Top-level inspector over one object graph

use std::sync::Arc;

use egui::{Rect, Sense, Ui};

use super::context::{Diagnostic, Env};
use super::editor::{DrawOutcome, NestedEditors};
use crate::config::InspectorConfig;
use crate::host::{EguiHost, InspectorHost};
use crate::layout::LayoutState;
use crate::model::{DataAccess, NodePath};
use crate::registry::{self, DecoratorRegistry, TypeRegistry};

/// Result of one draw pass
#[derive(Debug, Clone, Default)]
pub struct PassReport {
    pub outcome: DrawOutcome,
    pub diagnostics: Vec<Diagnostic>,
}

/// Draws the members of the root record, one field editor per member
pub struct Inspector {
    config: InspectorConfig,
    registry: Arc<DecoratorRegistry>,
    types: Arc<TypeRegistry>,
    root: NestedEditors,
    diagnostics: Vec<Diagnostic>,
}

impl Inspector {
    pub fn new(config: InspectorConfig, registry: Arc<DecoratorRegistry>, types: Arc<TypeRegistry>) -> Self {
        Self {
            config,
            registry,
            types,
            root: NestedEditors::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Inspector over the process-wide decorator registry
    pub fn with_config(config: InspectorConfig, types: Arc<TypeRegistry>) -> Self {
        Self::new(config, registry::global(), types)
    }

    pub fn config(&self) -> &InspectorConfig {
        &self.config
    }

    /// Diagnostics of the last height query
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Layout state of a node from the last pass
    pub fn state(&self, path: &NodePath) -> Option<&LayoutState> {
        self.root.find_state(path)
    }

    /// Kinds of the decorator chain resolved for a node
    pub fn chain_kinds(&self, path: &NodePath) -> Option<Vec<&'static str>> {
        self.root
            .find(path)
            .and_then(|editor| editor.chain())
            .map(|chain| chain.kinds())
    }

    /// Forget every editor, chain and layout state
    pub fn reset(&mut self) {
        self.root = NestedEditors::new();
        self.diagnostics.clear();
    }

    /// Height of the whole inspector; starts a pass
    pub fn height(&mut self, access: &mut dyn DataAccess) -> f32 {
        let mut env = Env::new(access, &self.registry, &self.types, &self.config);
        let height = self.root.members_height(&NodePath::root(), &mut env);
        self.diagnostics = env.diagnostics;
        height
    }

    /// Draw every member of the root into `rect`; completes the pass
    pub fn draw(&mut self, rect: Rect, access: &mut dyn DataAccess, host: &mut dyn InspectorHost) -> PassReport {
        let mut env = Env::new(access, &self.registry, &self.types, &self.config);
        let outcome = self.root.draw_members(&NodePath::root(), rect, &mut env, host);
        PassReport {
            outcome,
            diagnostics: env.diagnostics,
        }
    }

    /// Height query plus draw at the current position of an egui `Ui`
    pub fn show(&mut self, ui: &mut Ui, access: &mut dyn DataAccess) -> PassReport {
        let height = self.height(access);
        let width = ui.available_width();
        let (rect, _) = ui.allocate_exact_size(egui::vec2(width, height), Sense::hover());
        let mut host = EguiHost::new(ui);
        let mut report = self.draw(rect, access, &mut host);
        let mut diagnostics = std::mem::take(&mut self.diagnostics);
        diagnostics.append(&mut report.diagnostics);
        report.diagnostics = diagnostics;
        report
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use egui::{pos2, vec2, Color32};

    use super::*;
    use crate::decorators::array_label::ArrayLabel;
    use crate::decorators::background_color::BackgroundColor;
    use crate::decorators::hide_if::HideIf;
    use crate::decorators::maximum::Maximum;
    use crate::decorators::remove_foldout::RemoveFoldout;
    use crate::error::{InspectorError, Result};
    use crate::host::{DrawCommand, RecordingHost};
    use crate::model::{FieldMeta, Schema, TypeKey, Value, ValueTree};
    use crate::pipeline::context::PhaseContext;
    use crate::pipeline::decorator::{Decorator, DecoratorFactory, DecoratorSpec};
    use crate::pipeline::phase::{Overrides, Phase};
    use crate::registry::Binding;

    const LINE: f32 = 18.0;
    const SPACING: f32 = 2.0;

    fn area() -> Rect {
        Rect::from_min_size(pos2(0.0, 0.0), vec2(400.0, 600.0))
    }

    fn path(text: &str) -> NodePath {
        NodePath::parse(text).unwrap()
    }

    fn inspector_with(registry: DecoratorRegistry) -> Inspector {
        Inspector::new(InspectorConfig::default(), Arc::new(registry), Arc::new(TypeRegistry::new()))
    }

    fn inspector() -> Inspector {
        inspector_with(DecoratorRegistry::with_builtins())
    }

    fn pass(inspector: &mut Inspector, tree: &mut ValueTree, host: &mut RecordingHost) -> PassReport {
        inspector.height(tree);
        inspector.draw(area(), tree, host)
    }

    fn player(schema: Schema) -> ValueTree {
        let root = Value::record(
            TypeKey::named("Player"),
            vec![
                ("speed", Value::Float(15.0)),
                ("hidden", Value::Bool(false)),
                ("secret", Value::Int(7)),
            ],
        );
        ValueTree::new(root, Arc::new(schema))
    }

    fn clamp_schema() -> Schema {
        let mut schema = Schema::new();
        schema.declare(
            "Player",
            vec![
                FieldMeta::new("speed", TypeKey::float()).with_annotation(Arc::new(Maximum::float(10.0))),
                FieldMeta::new("hidden", TypeKey::bool()),
                FieldMeta::new("secret", TypeKey::int()).with_annotation(Arc::new(HideIf::new("hidden"))),
            ],
        );
        schema
    }

    #[test]
    fn test_clamp_scenario() {
        let mut tree = player(clamp_schema());
        let mut inspector = inspector();
        let mut host = RecordingHost::new();

        let report = pass(&mut inspector, &mut tree, &mut host);

        assert_eq!(tree.get(&path("speed")).and_then(Value::as_float), Some(10.0));
        assert!(report.outcome.committed);
        assert_eq!(tree.revision(), 1);
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_hide_if_scenario() {
        let mut tree = player(clamp_schema());
        let mut inspector = inspector();
        let mut host = RecordingHost::new();

        let visible = inspector.height(&mut tree);
        assert_eq!(visible, 3.0 * LINE + 2.0 * SPACING);

        tree.set(&path("hidden"), Value::Bool(true)).unwrap();
        let hidden = inspector.height(&mut tree);
        assert_eq!(hidden, 2.0 * LINE + SPACING);
        assert!(!inspector.state(&path("secret")).unwrap().draw_node);

        inspector.draw(area(), &mut tree, &mut host);
        assert!(!host.leaf_paths().contains(&&path("secret")));

        tree.set(&path("hidden"), Value::Bool(false)).unwrap();
        assert_eq!(inspector.height(&mut tree), visible);
    }

    fn stats_tree(expanded: bool) -> ValueTree {
        let stats = Value::record(
            TypeKey::named("Stats"),
            vec![
                ("hp", Value::Int(10)),
                ("mp", Value::Int(5)),
                ("xp", Value::Int(0)),
            ],
        );
        let root = Value::record(TypeKey::named("Player"), vec![("stats", stats)]);
        let mut tree = ValueTree::new(root, Arc::new(Schema::new()));
        tree.set_expanded(&path("stats"), expanded);
        tree
    }

    #[test]
    fn test_composite_expand_scenario() {
        let mut tree = stats_tree(false);
        let mut inspector = inspector();
        let mut host = RecordingHost::new();

        assert_eq!(inspector.height(&mut tree), LINE);
        let state = inspector.state(&path("stats")).unwrap();
        assert!(state.has_foldout);
        assert!(!state.should_draw_body());

        host.script_toggle(path("stats"));
        let report = inspector.draw(area(), &mut tree, &mut host);
        assert!(!report.outcome.changed);
        assert!(tree.is_expanded(&path("stats")));

        let children = 3.0 * LINE + 2.0 * SPACING;
        assert_eq!(inspector.height(&mut tree), LINE + children);

        host.clear();
        inspector.draw(area(), &mut tree, &mut host);
        let leaves: Vec<String> = host.leaf_paths().iter().map(|p| p.to_string()).collect();
        assert_eq!(leaves, vec!["stats.hp", "stats.mp", "stats.xp"]);

        // Members go one indent step in, one line below the label.
        let first = host
            .commands
            .iter()
            .find_map(|command| match command {
                DrawCommand::LeafEditor { rect, path, .. } if path.to_string() == "stats.hp" => Some(*rect),
                _ => None,
            })
            .unwrap();
        assert_eq!(first.min.y, LINE);
        assert!(first.min.x > 0.0);
    }

    #[test]
    fn test_nested_edit_commits_child_and_parent() {
        let mut tree = stats_tree(true);
        let mut inspector = inspector();
        let mut host = RecordingHost::new();
        host.script_edit(path("stats.mp"), Value::Int(9));

        let report = pass(&mut inspector, &mut tree, &mut host);
        assert!(report.outcome.committed);
        assert_eq!(tree.get(&path("stats.mp")), Some(&Value::Int(9)));
        // Child and parent both commit.
        assert_eq!(tree.revision(), 2);
    }

    #[test]
    fn test_commit_rejection_rolls_back() {
        let mut tree = stats_tree(true);
        tree.set_commit_hook(|path, value| {
            if path.to_string() == "stats.hp" && value.as_int() < Some(0) {
                Err("hp cannot be negative".to_string())
            } else {
                Ok(())
            }
        });
        let mut inspector = inspector();
        let mut host = RecordingHost::new();
        host.script_edit(path("stats.hp"), Value::Int(-4));

        let report = pass(&mut inspector, &mut tree, &mut host);
        assert_eq!(tree.get(&path("stats.hp")), Some(&Value::Int(10)));
        assert!(!report.outcome.committed);
        assert_eq!(tree.revision(), 0);
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].phase, Phase::CommitIfChanged);
        assert!(matches!(
            report.diagnostics[0].error,
            InspectorError::CommitRejected { .. }
        ));
    }

    #[test]
    fn test_unresolved_sibling_is_reported() {
        let mut schema = Schema::new();
        schema.declare(
            "Player",
            vec![FieldMeta::new("secret", TypeKey::int()).with_annotation(Arc::new(HideIf::new("missing")))],
        );
        let mut tree = player(schema);
        let mut inspector = inspector();

        inspector.height(&mut tree);
        let diagnostics = inspector.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].path, path("secret"));
        assert_eq!(diagnostics[0].decorator, "HideIf");
        assert_eq!(
            diagnostics[0].error,
            InspectorError::UnresolvedPath {
                field: "secret".to_string(),
                annotation: "HideIf",
                path: "missing".to_string(),
            }
        );
        // The node still renders with defaults.
        assert!(inspector.state(&path("secret")).unwrap().draw_node);
    }

    #[derive(Debug, Clone)]
    struct Caption(&'static str);
    crate::annotation!(Caption, "Caption");

    #[derive(Debug, Clone)]
    struct Shout(&'static str);
    crate::annotation!(Shout, "Shout");

    struct CaptionDecorator(&'static str);

    impl Decorator for CaptionDecorator {
        fn overrides(&self) -> Overrides {
            Overrides::LABEL
        }

        fn draw_label(&self, ctx: &mut PhaseContext<'_, '_>, rect: Rect, host: &mut dyn InspectorHost) -> Result<()> {
            host.label(rect, &format!("{}: {}", self.0, ctx.state.label));
            Ok(())
        }
    }

    impl DecoratorFactory for CaptionDecorator {
        const NAME: &'static str = "Caption";

        fn bindings() -> Vec<Binding> {
            vec![Binding::of_annotation::<Caption>()]
        }

        fn create(spec: &DecoratorSpec) -> Result<Self> {
            Ok(Self(spec.annotation::<Caption>(Self::NAME)?.0))
        }
    }

    struct ShoutDecorator(&'static str);

    impl Decorator for ShoutDecorator {
        fn overrides(&self) -> Overrides {
            Overrides::LABEL
        }

        fn draw_label(&self, _ctx: &mut PhaseContext<'_, '_>, rect: Rect, host: &mut dyn InspectorHost) -> Result<()> {
            host.label(rect, self.0);
            Ok(())
        }
    }

    impl DecoratorFactory for ShoutDecorator {
        const NAME: &'static str = "Shout";

        fn bindings() -> Vec<Binding> {
            vec![Binding::of_annotation::<Shout>()]
        }

        fn create(spec: &DecoratorSpec) -> Result<Self> {
            Ok(Self(spec.annotation::<Shout>(Self::NAME)?.0))
        }
    }

    #[test]
    fn test_first_label_override_wins() {
        let mut registry = DecoratorRegistry::with_builtins();
        registry.register::<CaptionDecorator>().register::<ShoutDecorator>();

        let mut schema = Schema::new();
        schema.declare(
            "Player",
            vec![FieldMeta::new("speed", TypeKey::float())
                .with_annotation(Arc::new(Maximum::float(100.0)))
                .with_annotation(Arc::new(Caption("A")))
                .with_annotation(Arc::new(Shout("B")))],
        );
        let mut tree = player(schema);
        let mut inspector = inspector_with(registry);
        let mut host = RecordingHost::new();
        pass(&mut inspector, &mut tree, &mut host);

        let labels = host.labels();
        assert!(labels.contains(&"A: Speed"));
        assert!(!labels.contains(&"B"));
        assert!(!labels.contains(&"Speed"));
    }

    struct Failing;

    impl Decorator for Failing {
        fn overrides(&self) -> Overrides {
            Overrides::LABEL
        }

        fn draw_label(&self, ctx: &mut PhaseContext<'_, '_>, _rect: Rect, _host: &mut dyn InspectorHost) -> Result<()> {
            Err(ctx.type_mismatch("record"))
        }
    }

    #[derive(Debug)]
    struct Broken;
    crate::annotation!(Broken, "Broken");

    impl DecoratorFactory for Failing {
        const NAME: &'static str = "Failing";

        fn bindings() -> Vec<Binding> {
            vec![Binding::of_annotation::<Broken>()]
        }

        fn create(_spec: &DecoratorSpec) -> Result<Self> {
            Ok(Failing)
        }
    }

    #[test]
    fn test_failing_winner_falls_back_to_default() {
        let mut registry = DecoratorRegistry::with_builtins();
        registry.register::<Failing>();
        let mut schema = Schema::new();
        schema.declare(
            "Player",
            vec![FieldMeta::new("speed", TypeKey::float()).with_annotation(Arc::new(Broken))],
        );
        let mut tree = player(schema);
        let mut inspector = inspector_with(registry);
        let mut host = RecordingHost::new();

        let report = pass(&mut inspector, &mut tree, &mut host);
        assert!(host.labels().contains(&"Speed"));
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].decorator, "Failing");
        assert_eq!(report.diagnostics[0].phase, Phase::DrawLabel);
    }

    static MEASURE_CALLS: AtomicUsize = AtomicUsize::new(0);

    #[derive(Debug)]
    struct SelfMeasure;
    crate::annotation!(SelfMeasure, "SelfMeasure");

    struct SelfMeasuring;

    impl Decorator for SelfMeasuring {
        fn modify_layout(&self, ctx: &mut PhaseContext<'_, '_>) -> Result<()> {
            MEASURE_CALLS.fetch_add(1, Ordering::SeqCst);
            let own = ctx.path().clone();
            let nested = ctx.measure(&own);
            ctx.state.after_extension_height = nested;
            Ok(())
        }
    }

    impl DecoratorFactory for SelfMeasuring {
        const NAME: &'static str = "SelfMeasuring";

        fn bindings() -> Vec<Binding> {
            vec![Binding::of_annotation::<SelfMeasure>()]
        }

        fn create(_spec: &DecoratorSpec) -> Result<Self> {
            Ok(SelfMeasuring)
        }
    }

    #[test]
    fn test_reentrant_height_is_bounded() {
        let mut registry = DecoratorRegistry::empty();
        registry.register::<SelfMeasuring>();
        let mut schema = Schema::new();
        schema.declare(
            "Player",
            vec![FieldMeta::new("speed", TypeKey::float()).with_annotation(Arc::new(SelfMeasure))],
        );
        let mut tree = player(schema);
        let mut inspector = inspector_with(registry);

        MEASURE_CALLS.store(0, Ordering::SeqCst);
        let height = inspector.height(&mut tree);
        // The nested query is answered from cache without running the chain.
        assert_eq!(MEASURE_CALLS.load(Ordering::SeqCst), 1);
        assert!(height > 0.0);
        assert_eq!(crate::pipeline::guard::active_count(), 0);
    }

    #[derive(Debug)]
    struct Counted;
    crate::annotation!(Counted, "Counted");

    struct Counter;

    impl Decorator for Counter {
        fn modify_layout(&self, ctx: &mut PhaseContext<'_, '_>) -> Result<()> {
            let passes = ctx.persistent::<u32>().copied().unwrap_or(0) + 1;
            ctx.set_persistent(passes);
            ctx.state.label = format!("pass {}", passes);
            Ok(())
        }
    }

    impl DecoratorFactory for Counter {
        const NAME: &'static str = "Counter";

        fn bindings() -> Vec<Binding> {
            vec![Binding::of_annotation::<Counted>()]
        }

        fn create(_spec: &DecoratorSpec) -> Result<Self> {
            Ok(Counter)
        }
    }

    #[test]
    fn test_persistent_store_survives_passes() {
        let mut registry = DecoratorRegistry::empty();
        registry.register::<Counter>();
        let mut schema = Schema::new();
        schema.declare(
            "Player",
            vec![FieldMeta::new("speed", TypeKey::float()).with_annotation(Arc::new(Counted))],
        );
        let mut tree = player(schema);
        let mut inspector = inspector_with(registry);
        let mut host = RecordingHost::new();

        for _ in 0..3 {
            pass(&mut inspector, &mut tree, &mut host);
        }
        assert_eq!(inspector.state(&path("speed")).unwrap().label, "pass 3");
        assert!(host.labels().contains(&"pass 3"));
    }

    static AFTER_DRAWS: AtomicUsize = AtomicUsize::new(0);
    static CHANGE_CALLS: AtomicUsize = AtomicUsize::new(0);

    #[derive(Debug)]
    struct Abortable;
    crate::annotation!(Abortable, "Abortable");

    /// Edits the value, then aborts the rest of the draw
    struct EditThenBreak;

    impl Decorator for EditThenBreak {
        fn overrides(&self) -> Overrides {
            Overrides::SUB_BODY
        }

        fn modify_layout(&self, ctx: &mut PhaseContext<'_, '_>) -> Result<()> {
            ctx.state.has_after_extension = true;
            ctx.state.after_extension_height = ctx.config().line_height;
            Ok(())
        }

        fn draw_sub_body(&self, ctx: &mut PhaseContext<'_, '_>, rect: Rect, host: &mut dyn InspectorHost) -> Result<()> {
            ctx.draw_default_leaf(rect, host)?;
            ctx.state.force_break = true;
            Ok(())
        }

        fn draw_after_extension(&self, _ctx: &mut PhaseContext<'_, '_>, _rect: Rect, _host: &mut dyn InspectorHost) -> Result<()> {
            AFTER_DRAWS.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn on_changed(&self, _ctx: &mut PhaseContext<'_, '_>) -> Result<()> {
            CHANGE_CALLS.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    impl DecoratorFactory for EditThenBreak {
        const NAME: &'static str = "EditThenBreak";

        fn bindings() -> Vec<Binding> {
            vec![Binding::of_annotation::<Abortable>()]
        }

        fn create(_spec: &DecoratorSpec) -> Result<Self> {
            Ok(EditThenBreak)
        }
    }

    #[test]
    fn test_force_break_aborts_draw_and_restores_value() {
        let mut registry = DecoratorRegistry::empty();
        registry.register::<EditThenBreak>();
        let mut schema = Schema::new();
        schema.declare(
            "Player",
            vec![FieldMeta::new("hp", TypeKey::int()).with_annotation(Arc::new(Abortable))],
        );
        let root = Value::record(TypeKey::named("Player"), vec![("hp", Value::Int(10))]);
        let mut tree = ValueTree::new(root, Arc::new(schema));
        tree.set_commit_hook(|_path, value| match value.as_int() {
            Some(hp) if hp < 0 => Err("hp cannot be negative".to_string()),
            _ => Ok(()),
        });
        let mut inspector = inspector_with(registry);
        let mut host = RecordingHost::new();
        host.script_edit(path("hp"), Value::Int(-4));

        AFTER_DRAWS.store(0, Ordering::SeqCst);
        CHANGE_CALLS.store(0, Ordering::SeqCst);
        let report = pass(&mut inspector, &mut tree, &mut host);

        assert!(report.outcome.changed);
        assert!(!report.outcome.committed);
        assert_eq!(tree.get(&path("hp")), Some(&Value::Int(10)));
        assert_eq!(tree.revision(), 0);
        assert!(report.diagnostics.is_empty());
        assert_eq!(AFTER_DRAWS.load(Ordering::SeqCst), 0);
        assert_eq!(CHANGE_CALLS.load(Ordering::SeqCst), 0);

        // The flag is cleared by the next height query.
        assert!(inspector.state(&path("hp")).unwrap().force_break);
        inspector.height(&mut tree);
        assert!(!inspector.state(&path("hp")).unwrap().force_break);
    }

    #[test]
    fn test_disabled_and_tinted_nodes_restore_host_state() {
        let mut schema = Schema::new();
        schema.declare(
            "Player",
            vec![
                FieldMeta::new("speed", TypeKey::float()).with_annotation(Arc::new(BackgroundColor::rgba(1.0, 0.0, 0.0, 1.0))),
                FieldMeta::new("hidden", TypeKey::bool()),
            ],
        );
        let mut tree = player(schema);
        let mut inspector = inspector();
        let mut host = RecordingHost::new();
        pass(&mut inspector, &mut tree, &mut host);

        let tints: Vec<Option<Color32>> = host
            .commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Label { tint, .. } => Some(*tint),
                _ => None,
            })
            .collect();
        assert_eq!(tints[0], Some(Color32::from_rgba_unmultiplied(255, 0, 0, 255)));
        assert!(tints[1..].iter().all(Option::is_none));
        assert!(host.is_enabled());
        assert_eq!(host.tint(), None);
    }

    #[test]
    fn test_array_elements_use_element_annotations() {
        let mut schema = Schema::new();
        schema.declare(
            "Inventory",
            vec![FieldMeta::new("items", TypeKey::list(TypeKey::string()))
                .with_element_annotation(Arc::new(ArrayLabel::default()))
                .with_annotation(Arc::new(RemoveFoldout))],
        );
        let root = Value::record(
            TypeKey::named("Inventory"),
            vec![(
                "items",
                Value::list(
                    TypeKey::string(),
                    vec![Value::String("sword".into()), Value::String("shield".into())],
                ),
            )],
        );
        let mut tree = ValueTree::new(root, Arc::new(schema));
        let mut inspector = inspector();
        let mut host = RecordingHost::new();
        pass(&mut inspector, &mut tree, &mut host);

        let labels = host.labels();
        assert!(labels.contains(&"Items"));
        assert!(labels.contains(&"1"));
        assert!(labels.contains(&"2"));
        assert!(!host.commands.iter().any(|command| matches!(command, DrawCommand::Foldout { .. })));
        assert_eq!(host.leaf_paths().len(), 2);
    }

    #[test]
    fn test_empty_registry_renders_defaults() {
        let mut tree = player(clamp_schema());
        let mut inspector = inspector_with(DecoratorRegistry::empty());
        let mut host = RecordingHost::new();
        let report = pass(&mut inspector, &mut tree, &mut host);

        assert_eq!(host.labels(), vec!["Speed", "Hidden", "Secret"]);
        assert_eq!(tree.get(&path("speed")).and_then(Value::as_float), Some(15.0));
        assert!(report.diagnostics.is_empty());
        assert_eq!(
            inspector.chain_kinds(&path("speed")),
            Some(vec!["Passthrough"])
        );
    }
}
