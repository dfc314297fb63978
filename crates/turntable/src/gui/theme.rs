use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;

/// Colours for the parts drawn without an image.
pub struct ThemeColors {
    pub disk: Srgba<f64>,
    pub label: Srgba<f64>,
    pub spindle: Srgba<f64>,
    pub note: Srgba<f64>,
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        Self {
            disk: Self::lookup_color(
                context,
                "theme_fg_color",
                Srgba::new(0.08, 0.08, 0.08, 1.0),
                Some(1.0),
            ),
            label: Self::lookup_color(
                context,
                "theme_selected_bg_color",
                Srgba::new(0.85, 0.25, 0.3, 1.0),
                Some(1.0),
            ),
            spindle: Self::lookup_color(
                context,
                "theme_bg_color",
                Srgba::new(0.9, 0.9, 0.9, 1.0),
                None,
            ),
            note: Self::lookup_color(
                context,
                "theme_selected_bg_color",
                Srgba::new(0.95, 0.35, 0.45, 1.0),
                Some(1.0),
            ),
        }
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        context
            .lookup_color(name)
            .map(|c| {
                let (r, g, b, a) = (
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    c.alpha() as f64,
                );
                Srgba::new(r, g, b, alpha_override.unwrap_or(a))
            })
            .unwrap_or(fallback)
    }
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.turntable-window, .turntable-drawing-area {
    background: none;
    background-color: transparent;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
