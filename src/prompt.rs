use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_TONE: &str = "Casual";
pub const DEFAULT_HOOK_COUNT: u8 = 10;
pub const MAX_HOOK_COUNT: u8 = 20;

/// Psychological frameworks a hook can be built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Framework {
    #[serde(rename = "Negativity Bias")]
    NegativityBias,
    #[serde(rename = "Curiosity Gap")]
    CuriosityGap,
    #[serde(rename = "'Us vs Them' Narrative", alias = "Us vs Them")]
    UsVsThem,
    #[serde(rename = "Immediate Value Promise")]
    ImmediateValuePromise,
}

impl Framework {
    pub const ALL: [Framework; 4] = [
        Framework::NegativityBias,
        Framework::CuriosityGap,
        Framework::UsVsThem,
        Framework::ImmediateValuePromise,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Framework::NegativityBias => "Negativity Bias",
            Framework::CuriosityGap => "Curiosity Gap",
            Framework::UsVsThem => "'Us vs Them' Narrative",
            Framework::ImmediateValuePromise => "Immediate Value Promise",
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookRequest {
    pub topic: String,
    pub frameworks: Vec<Framework>,
    pub tone: String,
    pub hook_count: u8,
}

impl HookRequest {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            frameworks: Framework::ALL.to_vec(),
            tone: DEFAULT_TONE.to_string(),
            hook_count: DEFAULT_HOOK_COUNT,
        }
    }
}

/// Builds the instruction block sent to the model. Topic, frameworks, tone and count appear verbatim.
pub fn compose_prompt(request: &HookRequest) -> String {
    let frameworks: &[Framework] = if request.frameworks.is_empty() {
        &Framework::ALL
    } else {
        &request.frameworks
    };

    let framework_list = frameworks
        .iter()
        .enumerate()
        .map(|(i, framework)| format!("{}. The {}", i + 1, framework))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are an expert viral video scriptwriter specializing in TikTok and Instagram Reels.
Your goal is to stop the scroll.

Generate {count} distinct, high-converting hooks for the topic: "{topic}"

Write every hook in a {tone} tone.

For each hook, use one of these psychological frameworks:
{framework_list}

Format each hook as:
- **Hook:** [Text]
- **Framework:** [Framework used]
- **Why it works:** [Brief 5-word explanation]
- **Visual Cue:** [Instruction for screen action]
"#,
        count = request.hook_count,
        topic = request.topic,
        tone = request.tone,
        framework_list = framework_list,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeds_every_selection_verbatim() {
        let request = HookRequest {
            topic: "fitness tips".into(),
            frameworks: vec![Framework::CuriosityGap],
            tone: "Casual".into(),
            hook_count: 5,
        };
        let prompt = compose_prompt(&request);

        assert!(prompt.contains("fitness tips"));
        assert!(prompt.contains("Curiosity Gap"));
        assert!(prompt.contains("Casual"));
        assert!(prompt.contains("Generate 5 distinct"));
        assert!(!prompt.contains("Negativity Bias"));
    }

    #[test]
    fn empty_selection_uses_all_frameworks() {
        let mut request = HookRequest::new("How to lose weight without the gym");
        request.frameworks.clear();
        let prompt = compose_prompt(&request);

        for framework in Framework::ALL {
            assert!(prompt.contains(framework.label()), "missing {framework}");
        }
        assert!(prompt.contains("Generate 10 distinct"));
    }

    #[test]
    fn composition_is_deterministic() {
        let request = HookRequest::new("budget travel");
        assert_eq!(compose_prompt(&request), compose_prompt(&request));
    }

    #[test]
    fn frameworks_deserialize_from_labels() {
        let parsed: Vec<Framework> =
            serde_json::from_str(r#"["Curiosity Gap", "Us vs Them", "Negativity Bias"]"#).unwrap();
        assert_eq!(
            parsed,
            vec![
                Framework::CuriosityGap,
                Framework::UsVsThem,
                Framework::NegativityBias
            ]
        );
    }
}
