//! Permission and model modes per agent.
//!
//! Each agent has a table of valid modes, each tagged with an intent shared
//! across agents. Switching agents keeps the mode when it is still valid,
//! otherwise maps it through its intent, otherwise falls back to the target
//! agent's default.

use crate::core::domain::AgentKind;

/// Cross-agent meaning of a permission mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionIntent {
    Ask,
    AcceptEdits,
    ReadOnly,
    Bypass,
}

/// Cross-agent meaning of a model mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelIntent {
    Default,
    Fast,
    Balanced,
    Strongest,
}

/// Valid modes for one agent
#[derive(Debug)]
pub struct ModeTable<I: 'static> {
    pub modes: &'static [(&'static str, I)],
    pub default: &'static str,
}

impl<I: Copy + PartialEq> ModeTable<I> {
    pub fn is_valid(&self, mode: &str) -> bool {
        self.modes.iter().any(|(m, _)| *m == mode)
    }

    pub fn intent(&self, mode: &str) -> Option<I> {
        self.modes.iter().find(|(m, _)| *m == mode).map(|(_, i)| *i)
    }

    /// First mode carrying `intent`
    pub fn mode_for(&self, intent: I) -> Option<&'static str> {
        self.modes.iter().find(|(_, i)| *i == intent).map(|(m, _)| *m)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        self.modes.iter().map(|(m, _)| *m)
    }
}

static CLAUDE_PERMISSIONS: ModeTable<PermissionIntent> = ModeTable {
    modes: &[
        ("default", PermissionIntent::Ask),
        ("acceptEdits", PermissionIntent::AcceptEdits),
        ("plan", PermissionIntent::ReadOnly),
        ("bypassPermissions", PermissionIntent::Bypass),
    ],
    default: "default",
};

static CODEX_PERMISSIONS: ModeTable<PermissionIntent> = ModeTable {
    modes: &[
        ("default", PermissionIntent::Ask),
        ("read-only", PermissionIntent::ReadOnly),
        ("safe-yolo", PermissionIntent::AcceptEdits),
        ("yolo", PermissionIntent::Bypass),
    ],
    default: "default",
};

static CLAUDE_MODELS: ModeTable<ModelIntent> = ModeTable {
    modes: &[
        ("default", ModelIntent::Default),
        ("haiku", ModelIntent::Fast),
        ("sonnet", ModelIntent::Balanced),
        ("opus", ModelIntent::Strongest),
    ],
    default: "default",
};

static CODEX_MODELS: ModeTable<ModelIntent> = ModeTable {
    modes: &[
        ("default", ModelIntent::Default),
        ("gpt-5-codex-low", ModelIntent::Fast),
        ("gpt-5-codex-medium", ModelIntent::Balanced),
        ("gpt-5-codex-high", ModelIntent::Strongest),
    ],
    default: "default",
};

static GEMINI_MODELS: ModeTable<ModelIntent> = ModeTable {
    modes: &[
        ("default", ModelIntent::Default),
        ("gemini-2.5-flash-lite", ModelIntent::Fast),
        ("gemini-2.5-flash", ModelIntent::Balanced),
        ("gemini-2.5-pro", ModelIntent::Strongest),
    ],
    default: "default",
};

/// Permission mode table for `agent`. Gemini shares Codex's modes.
pub fn permission_table(agent: AgentKind) -> &'static ModeTable<PermissionIntent> {
    match agent {
        AgentKind::Claude => &CLAUDE_PERMISSIONS,
        AgentKind::Codex | AgentKind::Gemini => &CODEX_PERMISSIONS,
    }
}

/// Model mode table for `agent`
pub fn model_table(agent: AgentKind) -> &'static ModeTable<ModelIntent> {
    match agent {
        AgentKind::Claude => &CLAUDE_MODELS,
        AgentKind::Codex => &CODEX_MODELS,
        AgentKind::Gemini => &GEMINI_MODELS,
    }
}

fn reconcile<I: Copy + PartialEq>(
    mode: &str,
    from: &ModeTable<I>,
    to: &'static ModeTable<I>,
) -> &'static str {
    if let Some(kept) = to.names().find(|m| *m == mode) {
        return kept;
    }
    from.intent(mode)
        .and_then(|intent| to.mode_for(intent))
        .unwrap_or(to.default)
}

/// Permission mode to use after switching from `from` to `to`.
pub fn reconcile_permission(mode: &str, from: AgentKind, to: AgentKind) -> &'static str {
    reconcile(mode, permission_table(from), permission_table(to))
}

/// Model mode to use after switching from `from` to `to`.
pub fn reconcile_model(mode: &str, from: AgentKind, to: AgentKind) -> &'static str {
    reconcile(mode, model_table(from), model_table(to))
}
