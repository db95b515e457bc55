/// One labeled line of the data section.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub label: &'static str,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Empty,
    Fields(Vec<Field>),
    Dump(String),
}

/// Everything the window shows, computed from the store alone.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub connected: bool,
    pub body: Body,
}

impl Rendered {
    pub fn status_text(&self) -> &'static str {
        if self.connected {
            "Connected"
        } else {
            "Disconnected"
        }
    }
}

impl Default for Rendered {
    fn default() -> Self {
        Self {
            connected: false,
            body: Body::Empty,
        }
    }
}

pub trait Render {
    fn body(&self) -> Body;
}

pub fn render<T: Render>(value: Option<&T>, connected: bool) -> Rendered {
    Rendered {
        connected,
        body: value.map_or(Body::Empty, Render::body),
    }
}

/// Fixed 4-decimal formatting of named components, e.g. `x=1.0000, y=2.0000`.
pub fn components(values: &[(&str, f64)]) -> String {
    values
        .iter()
        // -0.0 prints as 0.0000
        .map(|(name, v)| format!("{name}={:.4}", v + 0.0))
        .collect::<Vec<_>>()
        .join(", ")
}
