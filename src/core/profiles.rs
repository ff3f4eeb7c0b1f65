//! Built-in profile catalogue.
//!
//! Profiles shipped with sesame. User profiles in settings shadow these by id.

use crate::core::domain::{AgentKind, EnvVarDecl, Profile};

/// All built-in profiles, in display order.
pub fn builtin() -> Vec<Profile> {
    vec![
        anthropic(),
        deepseek(),
        zai(),
        openai(),
        azure_openai(),
    ]
}

/// Look up a built-in profile by id.
pub fn builtin_by_id(id: &str) -> Option<Profile> {
    builtin().into_iter().find(|p| p.id == id)
}

fn anthropic() -> Profile {
    Profile {
        default_permission_mode: Some("default".to_string()),
        ..Profile::new("anthropic", "Anthropic (default)")
            .with_agents(&[AgentKind::Claude])
            .with_env(EnvVarDecl::optional_secret("ANTHROPIC_API_KEY"))
    }
}

fn deepseek() -> Profile {
    Profile {
        base_url: Some("https://api.deepseek.com/anthropic".to_string()),
        model: Some("deepseek-chat".to_string()),
        ..Profile::new("deepseek", "DeepSeek")
            .with_agents(&[AgentKind::Claude])
            .with_env(EnvVarDecl::secret("DEEPSEEK_API_KEY").with_alias("ANTHROPIC_AUTH_TOKEN"))
            .with_env(EnvVarDecl::plain(
                "ANTHROPIC_BASE_URL",
                "https://api.deepseek.com/anthropic",
            ))
            .with_env(EnvVarDecl::plain("ANTHROPIC_MODEL", "deepseek-chat"))
    }
}

fn zai() -> Profile {
    Profile {
        base_url: Some("https://api.z.ai/api/anthropic".to_string()),
        model: Some("glm-4.6".to_string()),
        ..Profile::new("zai", "Z.AI (GLM)")
            .with_agents(&[AgentKind::Claude])
            .with_env(EnvVarDecl::secret("Z_AI_API_KEY").with_alias("ANTHROPIC_AUTH_TOKEN"))
            .with_env(EnvVarDecl::plain(
                "ANTHROPIC_BASE_URL",
                "https://api.z.ai/api/anthropic",
            ))
            .with_env(EnvVarDecl::plain("ANTHROPIC_MODEL", "glm-4.6"))
    }
}

fn openai() -> Profile {
    Profile {
        model: Some("gpt-5-codex".to_string()),
        ..Profile::new("openai", "OpenAI")
            .with_agents(&[AgentKind::Codex])
            .with_env(EnvVarDecl::secret("OPENAI_API_KEY"))
    }
}

fn azure_openai() -> Profile {
    Profile::new("azure-openai", "Azure OpenAI")
        .with_agents(&[AgentKind::Codex])
        .with_env(EnvVarDecl::secret("AZURE_OPENAI_API_KEY"))
        .with_env(EnvVarDecl::plain(
            "AZURE_OPENAI_ENDPOINT",
            "https://your-resource.openai.azure.com",
        ))
        .with_env(EnvVarDecl::plain("AZURE_OPENAI_API_VERSION", "2024-10-21"))
}
