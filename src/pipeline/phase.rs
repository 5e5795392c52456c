//! Render phases and the capability flags that gate them

use bitflags::bitflags;

use crate::model::AnnotationFamily;

/// One step of a node's pass, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    ResolveChain,
    ModifyLayout,
    Validate,
    DrawBeforeExtension,
    DrawLabelPrefix,
    DrawLabel,
    DrawFoldoutToggle,
    DrawSubBody,
    DrawBody,
    DrawAfterExtension,
    CommitIfChanged,
    OnChanged,
}

impl Phase {
    /// Every phase in execution order
    pub const ORDER: [Phase; 12] = [
        Phase::ResolveChain,
        Phase::ModifyLayout,
        Phase::Validate,
        Phase::DrawBeforeExtension,
        Phase::DrawLabelPrefix,
        Phase::DrawLabel,
        Phase::DrawFoldoutToggle,
        Phase::DrawSubBody,
        Phase::DrawBody,
        Phase::DrawAfterExtension,
        Phase::CommitIfChanged,
        Phase::OnChanged,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Phase::ResolveChain => "resolve chain",
            Phase::ModifyLayout => "modify layout",
            Phase::Validate => "validate",
            Phase::DrawBeforeExtension => "draw before extension",
            Phase::DrawLabelPrefix => "draw label prefix",
            Phase::DrawLabel => "draw label",
            Phase::DrawFoldoutToggle => "draw foldout",
            Phase::DrawSubBody => "draw sub-body",
            Phase::DrawBody => "draw body",
            Phase::DrawAfterExtension => "draw after extension",
            Phase::CommitIfChanged => "commit",
            Phase::OnChanged => "on changed",
        }
    }

    /// Phases in which every chain member runs, in chain order
    pub fn is_additive(self) -> bool {
        matches!(
            self,
            Phase::ModifyLayout
                | Phase::Validate
                | Phase::DrawBeforeExtension
                | Phase::DrawAfterExtension
                | Phase::OnChanged
        )
    }

    /// Override flag for single-winner phases
    pub fn override_flag(self) -> Option<Overrides> {
        match self {
            Phase::DrawLabelPrefix => Some(Overrides::LABEL_PREFIX),
            Phase::DrawLabel => Some(Overrides::LABEL),
            Phase::DrawSubBody => Some(Overrides::SUB_BODY),
            Phase::DrawBody => Some(Overrides::BODY),
            _ => None,
        }
    }
}

bitflags! {
    /// What a chain engine is allowed to do
    ///
    /// Rich chains carry every capability; simple chains only extensions.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        const VALIDATE = 1 << 0;
        const LABEL_PREFIX = 1 << 1;
        const EXTENSIONS = 1 << 2;
        const REENTRANCY_GUARD = 1 << 3;
        const ENABLE_OVERRIDE = 1 << 4;
        const TINT_OVERRIDE = 1 << 5;
    }
}

impl Capabilities {
    pub fn for_family(family: AnnotationFamily) -> Self {
        match family {
            AnnotationFamily::Rich => Capabilities::all(),
            AnnotationFamily::Simple => Capabilities::EXTENSIONS,
        }
    }
}

bitflags! {
    /// Single-winner phases a decorator takes over
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Overrides: u8 {
        const LABEL_PREFIX = 1 << 0;
        const LABEL = 1 << 1;
        const SUB_BODY = 1 << 2;
        const BODY = 1 << 3;
    }
}
