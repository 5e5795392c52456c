//! Field editors
//!
//! A [`FieldEditor`] owns the decorator chain and the per-path layout states of
//! one field, and runs the render pipeline for it. Composite fields own a
//! [`NestedEditors`] set for their members, so the whole inspected tree is a
//! tree of editors mirroring the data.

use std::collections::HashMap;
use std::sync::Arc;

use egui::{pos2, vec2, Rect};

use super::context::{Env, PhaseContext};
use super::decorator::Decorator;
use super::guard::{self, LayoutEntry};
use super::phase::{Capabilities, Phase};
use crate::decorators::passthrough::PassthroughDecorator;
use crate::error::Result;
use crate::host::InspectorHost;
use crate::layout::{LayoutState, NodeShape, Regions};
use crate::model::{FieldMeta, NodePath, Value};
use crate::registry::{ChainBuilder, ChainLink, DecoratorChain};

/// Structural defaults for single-winner phases nobody overrides
static STRUCTURAL: PassthroughDecorator = PassthroughDecorator;

/// Result of drawing one node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawOutcome {
    /// The node's value differs from its value at draw entry
    pub changed: bool,
    /// The change was accepted by the data model
    pub committed: bool,
}

impl DrawOutcome {
    pub fn merge(&mut self, other: DrawOutcome) {
        self.changed |= other.changed;
        self.committed |= other.committed;
    }
}

/// Editors for the members of a composite node, keyed by path
#[derive(Default)]
pub struct NestedEditors {
    editors: HashMap<NodePath, FieldEditor>,
}

impl NestedEditors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.editors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.editors.is_empty()
    }

    fn editor(&mut self, path: &NodePath, env: &Env<'_>) -> Option<&mut FieldEditor> {
        if !self.editors.contains_key(path) {
            let field = env.access.field_meta(path)?;
            self.editors.insert(path.clone(), FieldEditor::new(field));
        }
        self.editors.get_mut(path)
    }

    /// Height of the node at `path`
    pub fn height(&mut self, path: &NodePath, env: &mut Env<'_>) -> f32 {
        match self.editor(path, env) {
            Some(editor) => editor.height(path, env),
            None => 0.0,
        }
    }

    /// Combined height of `owner`'s visible members, with spacing between rows
    pub fn members_height(&mut self, owner: &NodePath, env: &mut Env<'_>) -> f32 {
        let spacing = env.config.vertical_spacing;
        let mut total = 0.0;
        let mut visible = 0;
        for member in env.access.members(owner) {
            let height = self.height(&member, env);
            if height > 0.0 {
                if visible > 0 {
                    total += spacing;
                }
                total += height;
                visible += 1;
            }
        }
        total
    }

    /// Draw `owner`'s members stacked top to bottom in `rect`
    pub fn draw_members(
        &mut self,
        owner: &NodePath,
        rect: Rect,
        env: &mut Env<'_>,
        host: &mut dyn InspectorHost,
    ) -> DrawOutcome {
        let spacing = env.config.vertical_spacing;
        let mut outcome = DrawOutcome::default();
        let mut y = rect.min.y;
        for member in env.access.members(owner) {
            let Some(editor) = self.editor(&member, env) else {
                continue;
            };
            let height = match editor.state(&member) {
                Some(state) => state.last_height,
                None => editor.height(&member, env),
            };
            if height <= 0.0 {
                continue;
            }
            let row = Rect::from_min_size(pos2(rect.min.x, y), vec2(rect.width(), height));
            outcome.merge(editor.draw(row, &member, env, host));
            y += height + spacing;
        }
        outcome
    }

    /// Editor responsible for `path`, searching nested members depth first
    pub fn find(&self, path: &NodePath) -> Option<&FieldEditor> {
        if let Some(editor) = self.editors.get(path) {
            return Some(editor);
        }
        self.editors.values().find_map(|editor| editor.nested.find(path))
    }

    pub fn find_state(&self, path: &NodePath) -> Option<&LayoutState> {
        self.find(path).and_then(|editor| editor.state(path))
    }
}

/// Pipeline for one field
pub struct FieldEditor {
    field: Arc<FieldMeta>,
    capabilities: Capabilities,
    chain: Option<DecoratorChain>,
    states: HashMap<NodePath, LayoutState>,
    nested: NestedEditors,
}

impl FieldEditor {
    pub fn new(field: Arc<FieldMeta>) -> Self {
        let capabilities = Capabilities::for_family(field.family());
        Self {
            field,
            capabilities,
            chain: None,
            states: HashMap::new(),
            nested: NestedEditors::new(),
        }
    }

    pub fn field(&self) -> &FieldMeta {
        &self.field
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn chain(&self) -> Option<&DecoratorChain> {
        self.chain.as_ref()
    }

    pub fn state(&self, path: &NodePath) -> Option<&LayoutState> {
        self.states.get(path)
    }

    /// Build the chain on first use, and again if it resolved nothing or the
    /// runtime type of the value changed
    fn ensure_chain(&mut self, path: &NodePath, env: &mut Env<'_>) {
        let runtime = env
            .access
            .get(path)
            .map(Value::type_key)
            .unwrap_or_else(|| self.field.declared.clone());
        let stale = match &self.chain {
            None => true,
            Some(chain) => chain.is_empty() || chain.built_for() != &runtime,
        };
        if !stale {
            return;
        }

        let (mut chain, failures) = ChainBuilder::new(env.registry).build(&self.field, &runtime);
        let unchanged = self
            .chain
            .as_ref()
            .is_some_and(|previous| previous.kinds() == chain.kinds());
        if let Some(previous) = &self.chain {
            chain.adopt_ids(previous);
        }
        // An identical rebuild already reported its failures.
        if !unchanged {
            for failure in failures {
                env.report(path, failure.kind, Phase::ResolveChain, failure.error);
            }
        }
        self.chain = Some(chain);
    }

    fn measure_shape(&mut self, path: &NodePath, env: &mut Env<'_>) -> NodeShape {
        let line = env.config.line_height;
        let expanded = env.access.is_expanded(path);
        let is_array_element = path.element_index().is_some();
        if !env.access.has_children(path) {
            return NodeShape {
                has_children: false,
                expanded,
                body_height: line,
                is_array_element,
            };
        }
        // Members are measured even when collapsed, so the foldout decision
        // does not depend on the expansion state.
        let body_height = self.nested.members_height(path, env);
        NodeShape {
            has_children: line + body_height > line,
            expanded,
            body_height,
            is_array_element,
        }
    }

    fn cached_height(&self, path: &NodePath, line_height: f32) -> f32 {
        self.states
            .get(path)
            .map_or(line_height, |state| state.last_height)
    }

    /// Reset the layout state of `path` and run the layout phase; returns the
    /// node's total height for this pass
    pub fn height(&mut self, path: &NodePath, env: &mut Env<'_>) -> f32 {
        if env.access.get(path).is_none() {
            return 0.0;
        }

        let _token = if self.capabilities.contains(Capabilities::REENTRANCY_GUARD) {
            match guard::enter_layout(path) {
                LayoutEntry::Entered(token) => Some(token),
                LayoutEntry::Reentered => return self.cached_height(path, env.config.line_height),
            }
        } else {
            None
        };

        self.ensure_chain(path, env);
        let shape = self.measure_shape(path, env);

        let Self {
            field,
            chain,
            states,
            nested,
            ..
        } = self;
        let Some(chain) = chain.as_ref() else {
            return 0.0;
        };
        let state = states.entry(path.clone()).or_default();
        state.reset(&shape, &field.display_name, env.config);

        let mut frame = Frame {
            path,
            field: field.as_ref(),
            state,
            nested,
            env,
        };
        frame.run_additive(chain, Phase::ModifyLayout, |decorator, ctx| {
            decorator.modify_layout(ctx)
        });

        let height = frame.state.total_height();
        frame.state.last_height = height;
        height
    }

    /// Draw the node into `rect` using the state of the preceding height query
    pub fn draw(
        &mut self,
        rect: Rect,
        path: &NodePath,
        env: &mut Env<'_>,
        host: &mut dyn InspectorHost,
    ) -> DrawOutcome {
        if env.access.get(path).is_none() {
            return DrawOutcome::default();
        }
        if !self.states.contains_key(path) {
            self.height(path, env);
        }

        let guarded = self.capabilities.contains(Capabilities::REENTRANCY_GUARD);
        let _token = if guarded {
            match guard::enter_draw(path) {
                Some(token) => Some(token),
                None => return self.draw_structural(rect, path, env, host),
            }
        } else {
            None
        };

        let capabilities = self.capabilities;
        let Self {
            field,
            chain,
            states,
            nested,
            ..
        } = self;
        let (Some(chain), Some(state)) = (chain.as_ref(), states.get_mut(path)) else {
            return DrawOutcome::default();
        };
        if !state.draw_node || state.force_break {
            return DrawOutcome::default();
        }

        let snapshot = env.access.get(path).cloned();
        let saved_enabled = host.is_enabled();
        let saved_tint = host.tint();
        if capabilities.contains(Capabilities::ENABLE_OVERRIDE) {
            host.set_enabled(state.enable_state.resolve(saved_enabled));
        }
        if capabilities.contains(Capabilities::TINT_OVERRIDE) && state.tint.is_some() {
            host.set_tint(state.tint);
        }

        let mut frame = Frame {
            path,
            field: field.as_ref(),
            state,
            nested,
            env,
        };
        let mut changed = frame.draw_phases(chain, capabilities, rect, host);

        host.set_enabled(saved_enabled);
        host.set_tint(saved_tint);

        changed |= frame.env.access.get(path) != snapshot.as_ref();
        let mut outcome = DrawOutcome {
            changed,
            committed: false,
        };
        if !changed {
            return outcome;
        }
        // An aborted draw never commits, so whatever it wrote is undone.
        if frame.state.force_break {
            restore(&mut *frame.env, path, snapshot, chain.root().kind);
            return outcome;
        }

        match frame.env.access.commit(path) {
            Ok(()) => {
                outcome.committed = true;
                frame.run_additive(chain, Phase::OnChanged, |decorator, ctx| decorator.on_changed(ctx));
            }
            Err(error) => {
                restore(&mut *frame.env, path, snapshot, chain.root().kind);
                frame
                    .env
                    .report(path, chain.root().kind, Phase::CommitIfChanged, error);
            }
        }
        outcome
    }

    /// Default rendering for a node that is already being drawn further up
    fn draw_structural(
        &mut self,
        rect: Rect,
        path: &NodePath,
        env: &mut Env<'_>,
        host: &mut dyn InspectorHost,
    ) -> DrawOutcome {
        if env.access.has_children(path) {
            return self.nested.draw_members(path, rect, env, host);
        }
        let Some(snapshot) = env.access.get(path).cloned() else {
            return DrawOutcome::default();
        };
        let mut value = snapshot.clone();
        if !host.leaf_editor(rect, path, &mut value) || value == snapshot {
            return DrawOutcome::default();
        }
        if let Err(error) = env.access.set(path, value) {
            env.report(path, STRUCTURAL_NAME, Phase::DrawSubBody, error);
            return DrawOutcome::default();
        }

        let mut outcome = DrawOutcome {
            changed: true,
            committed: false,
        };
        match env.access.commit(path) {
            Ok(()) => outcome.committed = true,
            Err(error) => {
                restore(env, path, Some(snapshot), STRUCTURAL_NAME);
                env.report(path, STRUCTURAL_NAME, Phase::CommitIfChanged, error);
            }
        }
        outcome
    }
}

const STRUCTURAL_NAME: &str = crate::decorators::passthrough::NAME;

/// Put the value captured at draw entry back
fn restore(env: &mut Env<'_>, path: &NodePath, snapshot: Option<Value>, decorator: &'static str) {
    let Some(snapshot) = snapshot else {
        return;
    };
    if let Err(error) = env.access.set(path, snapshot) {
        env.report(path, decorator, Phase::CommitIfChanged, error);
    }
}

/// Borrowed pieces of one node, from which phase contexts are built
struct Frame<'a, 'e> {
    path: &'a NodePath,
    field: &'a FieldMeta,
    state: &'a mut LayoutState,
    nested: &'a mut NestedEditors,
    env: &'a mut Env<'e>,
}

impl<'e> Frame<'_, 'e> {
    fn context(&mut self, link: &ChainLink) -> PhaseContext<'_, 'e> {
        PhaseContext::new(
            self.path,
            self.field,
            &mut *self.state,
            &mut *self.env,
            &mut *self.nested,
            link.id,
            link.source(),
        )
    }

    /// Run an additive phase over the root and every member, in order
    fn run_additive<F>(&mut self, chain: &DecoratorChain, phase: Phase, mut run: F) -> bool
    where
        F: FnMut(&dyn Decorator, &mut PhaseContext<'_, 'e>) -> Result<()>,
    {
        let mut changed = false;
        for link in chain.links() {
            if phase != Phase::ModifyLayout && self.state.force_break {
                break;
            }
            let (result, link_changed) = {
                let mut ctx = self.context(link);
                let result = run(link.decorator(), &mut ctx);
                (result, ctx.changed())
            };
            changed |= link_changed;
            if let Err(error) = result {
                self.env.report(self.path, link.kind, phase, error);
            }
        }
        changed
    }

    /// Run a single-winner phase: the root if it overrides, else the first
    /// member that does, else the structural default
    fn run_single<F>(
        &mut self,
        chain: &DecoratorChain,
        phase: Phase,
        host: &mut dyn InspectorHost,
        mut run: F,
    ) -> bool
    where
        F: FnMut(&dyn Decorator, &mut PhaseContext<'_, 'e>, &mut dyn InspectorHost) -> Result<()>,
    {
        let winner = phase.override_flag().and_then(|flag| {
            chain
                .links()
                .find(|link| link.decorator().overrides().contains(flag))
        });
        let link = winner.unwrap_or(chain.root());
        let decorator: &dyn Decorator = match winner {
            Some(link) => link.decorator(),
            None => &STRUCTURAL,
        };

        let (result, mut changed) = {
            let mut ctx = self.context(link);
            let result = run(decorator, &mut ctx, &mut *host);
            (result, ctx.changed())
        };
        if let Err(error) = result {
            let kind = if winner.is_some() { link.kind } else { STRUCTURAL_NAME };
            self.env.report(self.path, kind, phase, error);
            if winner.is_some() {
                let mut ctx = self.context(link);
                let fallback = run(&STRUCTURAL, &mut ctx, &mut *host);
                changed |= ctx.changed();
                if let Err(error) = fallback {
                    self.env.report(self.path, STRUCTURAL_NAME, phase, error);
                }
            }
        }
        changed
    }

    fn draw_phases(
        &mut self,
        chain: &DecoratorChain,
        capabilities: Capabilities,
        rect: Rect,
        host: &mut dyn InspectorHost,
    ) -> bool {
        let mut changed = false;

        if capabilities.contains(Capabilities::VALIDATE) {
            changed |= self.run_additive(chain, Phase::Validate, |decorator, ctx| decorator.validate(ctx));
        }

        let regions = Regions::compute(rect, self.state, self.env.config);

        if capabilities.contains(Capabilities::EXTENSIONS) && self.state.has_before_extension {
            changed |= self.run_additive(chain, Phase::DrawBeforeExtension, |decorator, ctx| {
                decorator.draw_before_extension(ctx, regions.before_extension, &mut *host)
            });
        }
        if self.state.force_break {
            return changed;
        }

        if capabilities.contains(Capabilities::LABEL_PREFIX) && self.state.should_draw_label_prefix() {
            let was_enabled = host.is_enabled();
            if self.state.has_label {
                host.set_enabled(false);
            }
            changed |= self.run_single(chain, Phase::DrawLabelPrefix, host, |decorator, ctx, host| {
                decorator.draw_label_prefix(ctx, regions.label_prefix, host)
            });
            host.set_enabled(was_enabled);
        }

        if self.state.has_label {
            changed |= self.run_single(chain, Phase::DrawLabel, host, |decorator, ctx, host| {
                decorator.draw_label(ctx, regions.label, host)
            });
        }

        if self.state.has_foldout {
            let expanded = self.env.access.is_expanded(self.path);
            let toggled = host.foldout(regions.foldout, self.path, expanded);
            if toggled != expanded {
                self.env.access.set_expanded(self.path, toggled);
                self.state.expanded = toggled;
            }
        }

        if self.state.should_draw_sub_body() {
            changed |= self.run_single(chain, Phase::DrawSubBody, host, |decorator, ctx, host| {
                decorator.draw_sub_body(ctx, regions.sub_body, host)
            });
        }

        if self.state.should_draw_body() {
            changed |= self.run_single(chain, Phase::DrawBody, host, |decorator, ctx, host| {
                decorator.draw_body(ctx, regions.body, host)
            });
        }

        if !self.state.force_break
            && capabilities.contains(Capabilities::EXTENSIONS)
            && self.state.has_after_extension
        {
            changed |= self.run_additive(chain, Phase::DrawAfterExtension, |decorator, ctx| {
                decorator.draw_after_extension(ctx, regions.after_extension, &mut *host)
            });
        }

        changed
    }
}
