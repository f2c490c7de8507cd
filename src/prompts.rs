pub const LECTURE_CORRECTION: &str = include_str!("../data/prompts/lecture_correction.txt");
pub const MEETING_CORRECTION: &str = include_str!("../data/prompts/meeting_correction.txt");

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}

/// Instruction template used to build the correction prompt. Selected by name
/// via `PROMPT_TEMPLATE`; the two variants differ only in wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptTemplate {
    #[default]
    Lecture,
    Meeting,
}

impl PromptTemplate {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "lecture" => Some(Self::Lecture),
            "meeting" => Some(Self::Meeting),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Lecture => "lecture",
            Self::Meeting => "meeting",
        }
    }

    fn text(&self) -> &'static str {
        match self {
            Self::Lecture => LECTURE_CORRECTION,
            Self::Meeting => MEETING_CORRECTION,
        }
    }

    /// Build the instruction, embedding both inputs verbatim.
    pub fn render(&self, reference: &str, transcript: &str) -> String {
        render(
            self.text(),
            &[("reference", reference), ("transcript", transcript)],
        )
    }
}
