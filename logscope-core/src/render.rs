//! Terminal styling used by console output.
//!
//! Every method of [`Renderer`] defaults to returning the text untouched, so
//! the formatting code never depends on a particular styling library. Enable
//! the `color` feature for [`AnsiRenderer`].

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Red,
    Yellow,
    Green,
    Blue,
    Magenta,
    Cyan,
    Gray,
    Bold,
    Dim,
}

pub trait Renderer {
    fn red(&self, text: &str) -> String {
        text.to_string()
    }

    fn yellow(&self, text: &str) -> String {
        text.to_string()
    }

    fn green(&self, text: &str) -> String {
        text.to_string()
    }

    fn blue(&self, text: &str) -> String {
        text.to_string()
    }

    fn magenta(&self, text: &str) -> String {
        text.to_string()
    }

    fn cyan(&self, text: &str) -> String {
        text.to_string()
    }

    fn gray(&self, text: &str) -> String {
        text.to_string()
    }

    fn bold(&self, text: &str) -> String {
        text.to_string()
    }

    fn dim(&self, text: &str) -> String {
        text.to_string()
    }

    fn paint(&self, style: Style, text: &str) -> String {
        match style {
            Style::Red => self.red(text),
            Style::Yellow => self.yellow(text),
            Style::Green => self.green(text),
            Style::Blue => self.blue(text),
            Style::Magenta => self.magenta(text),
            Style::Cyan => self.cyan(text),
            Style::Gray => self.gray(text),
            Style::Bold => self.bold(text),
            Style::Dim => self.dim(text),
        }
    }
}

/// Pass-through renderer.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainRenderer;

impl Renderer for PlainRenderer {}

#[cfg(feature = "color")]
#[derive(Debug, Default, Clone, Copy)]
pub struct AnsiRenderer;

#[cfg(feature = "color")]
impl Renderer for AnsiRenderer {
    fn red(&self, text: &str) -> String {
        colored::Colorize::red(text).to_string()
    }

    fn yellow(&self, text: &str) -> String {
        colored::Colorize::yellow(text).to_string()
    }

    fn green(&self, text: &str) -> String {
        colored::Colorize::green(text).to_string()
    }

    fn blue(&self, text: &str) -> String {
        colored::Colorize::blue(text).to_string()
    }

    fn magenta(&self, text: &str) -> String {
        colored::Colorize::magenta(text).to_string()
    }

    fn cyan(&self, text: &str) -> String {
        colored::Colorize::cyan(text).to_string()
    }

    fn gray(&self, text: &str) -> String {
        colored::Colorize::bright_black(text).to_string()
    }

    fn bold(&self, text: &str) -> String {
        colored::Colorize::bold(text).to_string()
    }

    fn dim(&self, text: &str) -> String {
        colored::Colorize::dimmed(text).to_string()
    }
}

/// Renderer matching the `colors` switch of the console configuration.
pub fn default_renderer(colors: bool) -> Box<dyn Renderer> {
    #[cfg(feature = "color")]
    {
        if colors {
            return Box::new(AnsiRenderer);
        }
    }
    #[cfg(not(feature = "color"))]
    let _ = colors;
    Box::new(PlainRenderer)
}
