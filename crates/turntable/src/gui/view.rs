use super::scene::Scene;
use super::{LABEL_RATIO, NOTE_GLYPH, SPINDLE_RATIO};
use crate::gui::theme::ThemeColors;
use cairo::Context;
use gdk_pixbuf::Pixbuf;
use gdk4::prelude::*;
use musicdisk::{Particle, Rect};
use palette::Srgba;
use std::f64::consts::PI;

fn set_color(cr: &Context, color: Srgba<f64>, alpha: f64) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a * alpha);
}

/// Paints `pixbuf` centred on the current origin.
fn paint_centered(cr: &Context, pixbuf: &Pixbuf, alpha: f64) -> Result<(), cairo::Error> {
    let (w, h) = (pixbuf.width() as f64, pixbuf.height() as f64);
    cr.set_source_pixbuf(pixbuf, -w / 2.0, -h / 2.0);
    cr.paint_with_alpha(alpha)
}

struct DiskRenderer<'a> {
    rect: Rect,
    angle: f64,
    pixbuf: Option<&'a Pixbuf>,
}

impl DiskRenderer<'_> {
    fn draw(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let center = self.rect.center();

        cr.save()?;
        cr.translate(center.x, center.y);
        cr.rotate(self.angle.to_radians());
        match self.pixbuf {
            Some(pixbuf) => paint_centered(cr, pixbuf, 1.0)?,
            None => self.draw_placeholder(cr, colors)?,
        }
        cr.restore()
    }

    fn draw_placeholder(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let radius = self.rect.width / 2.0;

        set_color(cr, colors.disk, 1.0);
        cr.arc(0.0, 0.0, radius, 0.0, 2.0 * PI);
        cr.fill()?;

        // off-centre mark on the label so the spin is visible
        set_color(cr, colors.label, 1.0);
        cr.arc(0.0, 0.0, radius * LABEL_RATIO, 0.0, 2.0 * PI);
        cr.fill()?;
        set_color(cr, colors.disk, 1.0);
        cr.arc(radius * LABEL_RATIO * 0.6, 0.0, radius * SPINDLE_RATIO, 0.0, 2.0 * PI);
        cr.fill()?;

        set_color(cr, colors.spindle, 1.0);
        cr.arc(0.0, 0.0, radius * SPINDLE_RATIO, 0.0, 2.0 * PI);
        cr.fill()
    }
}

struct NoteRenderer<'a> {
    particle: &'a Particle,
    icon_size: f64,
    pixbuf: Option<&'a Pixbuf>,
}

impl NoteRenderer<'_> {
    fn draw(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let transform = &self.particle.transform;
        // position is the icon's top-left corner; scale and rotation pivot
        // around its centre
        let half = self.icon_size / 2.0;

        cr.save()?;
        cr.translate(transform.position.x + half, transform.position.y + half);
        cr.rotate(transform.rotation.to_radians());
        cr.scale(transform.scale, transform.scale);
        match self.pixbuf {
            Some(pixbuf) => paint_centered(cr, pixbuf, transform.opacity)?,
            None => self.draw_glyph(cr, colors, transform.opacity)?,
        }
        cr.restore()
    }

    fn draw_glyph(
        &self,
        cr: &Context,
        colors: &ThemeColors,
        alpha: f64,
    ) -> Result<(), cairo::Error> {
        set_color(cr, colors.note, alpha);
        cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
        cr.set_font_size(self.icon_size);
        if let Ok(ext) = cr.text_extents(NOTE_GLYPH) {
            cr.move_to(
                -ext.width() / 2.0 - ext.x_bearing(),
                -ext.height() / 2.0 - ext.y_bearing(),
            );
            cr.show_text(NOTE_GLYPH)?;
        }
        Ok(())
    }
}

pub fn draw(cr: &Context, scene: &Scene, colors: &ThemeColors) -> Result<(), cairo::Error> {
    let disk = &scene.disk;
    let Some(geometry) = disk.geometry() else {
        return Ok(());
    };

    DiskRenderer {
        rect: geometry.disk,
        angle: disk.disk_angle(),
        pixbuf: scene.images.disk.as_ref(),
    }
    .draw(cr, colors)?;

    for particle in disk.particles() {
        NoteRenderer {
            particle,
            icon_size: f64::from(geometry.icon_size),
            pixbuf: scene.images.note(particle.image),
        }
        .draw(cr, colors)?;
    }
    Ok(())
}
