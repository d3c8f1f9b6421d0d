use serde::{Deserialize, Serialize};
use std::fmt;

/// Colour themes the frontend knows how to render.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Indigo,
    Emerald,
    Rose,
    Cyan,
    Amber,
    Violet,
}

impl Theme {
    pub const ALL: [Theme; 6] = [
        Theme::Indigo,
        Theme::Emerald,
        Theme::Rose,
        Theme::Cyan,
        Theme::Amber,
        Theme::Violet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Indigo => "Indigo",
            Theme::Emerald => "Emerald",
            Theme::Rose => "Rose",
            Theme::Cyan => "Cyan",
            Theme::Amber => "Amber",
            Theme::Violet => "Violet",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upper bound the model is asked to keep its reply under.
pub const REPLY_TOKEN_LIMIT: &str = "65,536";

/// Wraps the user's request in the web-designer instructions sent to the model.
///
/// The user prompt is expected to carry the page's current `innerHTML`
/// alongside what should change about it.
pub fn build_design_prompt(user_prompt: &str) -> String {
    let themes = Theme::ALL
        .iter()
        .map(|t| format!("\"{}\"", t))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"You are a web designer and you are given the innerHTML of a website as well as the user's prompt to modify
the innerHTML such that it fits their criteria.

The user prompt is {user_prompt}.

Without further elaboration, return ONLY a JSON response as follows afterwards (such that it's under {REPLY_TOKEN_LIMIT} tokens in total):
{{
    "reason": <Insert your reasons for changing in a paragraph>,
    "changes": <Insert the modified innerHTML>,
    "theme": <any of {themes}>
}}
"#
    )
}
