//! Hand-painted pie and bar charts.

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Shape, Stroke, Vec2};
use seed_core::view::{Bar, PEST_BAR_FILL, Rgb, SummaryView};
use std::f32::consts::{FRAC_PI_2, TAU};

const PIE_SIZE: f32 = 300.0;
const PIE_RADIUS: f32 = 110.0;
const BAR_CHART_HEIGHT: f32 = 320.0;
const BAR_CHART_MAX_WIDTH: f32 = 800.0;
const AXIS_LEFT: f32 = 40.0;
const AXIS_BOTTOM: f32 = 28.0;

fn color(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb.0, rgb.1, rgb.2)
}

/// Points along an arc, inclusive of both ends.
fn arc_points(center: Pos2, radius: f32, start: f32, sweep: f32) -> Vec<Pos2> {
    let steps = ((sweep / 0.05).ceil() as usize).max(1);
    (0..=steps)
        .map(|i| {
            let angle = start + sweep * i as f32 / steps as f32;
            center + radius * Vec2::angled(angle)
        })
        .collect()
}

pub(super) fn pie_chart(ui: &mut egui::Ui, summary: &SummaryView) {
    let slices = &summary.slices;
    let total = summary.total();
    let (resp, painter) = ui.allocate_painter(Vec2::splat(PIE_SIZE), Sense::hover());
    let center = resp.rect.center();
    let text_color = ui.visuals().text_color();

    if total == 0 {
        painter.circle_stroke(center, PIE_RADIUS, Stroke::new(1.0, Color32::DARK_GRAY));
    } else {
        let mut start = -FRAC_PI_2;
        for slice in slices.iter() {
            let sweep = slice.fraction(total) as f32 * TAU;
            if sweep <= 0.0 {
                continue;
            }
            let fill = color(slice.color);
            let arc = arc_points(center, PIE_RADIUS, start, sweep);
            // Triangles stay convex for sweeps past half a turn.
            for pair in arc.windows(2) {
                painter.add(Shape::convex_polygon(
                    vec![center, pair[0], pair[1]],
                    fill,
                    Stroke::NONE,
                ));
            }
            let mid = start + sweep / 2.0;
            painter.text(
                center + (PIE_RADIUS + 14.0) * Vec2::angled(mid),
                Align2::CENTER_CENTER,
                slice.value.to_string(),
                FontId::proportional(13.0),
                text_color,
            );
            start += sweep;
        }
    }

    for slice in slices.iter() {
        ui.horizontal(|ui| {
            let (swatch, _) = ui.allocate_exact_size(Vec2::splat(12.0), Sense::hover());
            ui.painter().rect_filled(swatch, 2.0, color(slice.color));
            ui.label(format!("{}: {}", slice.label, slice.value));
        });
    }
}

/// Tick step giving at most about five gridlines.
fn tick_step(max: u64) -> u64 {
    (max.div_ceil(5)).max(1)
}

/// Gridline values from zero up to the axis top, which is at least `max`.
fn axis_ticks(max: u32) -> Vec<u64> {
    let max = u64::from(max);
    let step = tick_step(max);
    let top = (max.div_ceil(step) * step).max(step);
    (0..=top).step_by(step as usize).collect()
}

pub(super) fn bar_chart(ui: &mut egui::Ui, bars: &[Bar]) {
    if bars.is_empty() {
        return;
    }
    let width = ui.available_width().min(BAR_CHART_MAX_WIDTH);
    let (resp, painter) = ui.allocate_painter(Vec2::new(width, BAR_CHART_HEIGHT), Sense::hover());
    let rect = resp.rect;
    let plot = Rect::from_min_max(
        Pos2::new(rect.left() + AXIS_LEFT, rect.top() + 8.0),
        Pos2::new(rect.right() - 8.0, rect.bottom() - AXIS_BOTTOM),
    );
    let text_color = ui.visuals().text_color();
    let grid = ui.visuals().widgets.noninteractive.bg_stroke;
    let font = FontId::proportional(12.0);

    let ticks = axis_ticks(bars.iter().map(|b| b.value).max().unwrap_or(0));
    let top = ticks.last().copied().unwrap_or(1).max(1);
    let y_for = |value: u64| plot.bottom() - plot.height() * (value as f64 / top as f64) as f32;

    for &tick in &ticks {
        let y = y_for(tick);
        painter.line_segment([Pos2::new(plot.left(), y), Pos2::new(plot.right(), y)], grid);
        painter.text(
            Pos2::new(plot.left() - 6.0, y),
            Align2::RIGHT_CENTER,
            tick.to_string(),
            font.clone(),
            text_color,
        );
    }

    let slot = plot.width() / bars.len() as f32;
    let fill = color(PEST_BAR_FILL);
    for (idx, bar) in bars.iter().enumerate() {
        let x_mid = plot.left() + slot * (idx as f32 + 0.5);
        let half = slot * 0.35;
        let bar_rect = Rect::from_min_max(
            Pos2::new(x_mid - half, y_for(u64::from(bar.value))),
            Pos2::new(x_mid + half, plot.bottom()),
        );
        painter.rect_filled(bar_rect, 0.0, fill);
        painter.text(
            Pos2::new(x_mid, plot.bottom() + 4.0),
            Align2::CENTER_TOP,
            &bar.category,
            font.clone(),
            text_color,
        );
    }
    painter.line_segment(
        [plot.left_bottom(), plot.right_bottom()],
        Stroke::new(1.0, text_color),
    );

    if let Some(pos) = resp.hover_pos()
        && plot.contains(pos)
    {
        let idx = ((pos.x - plot.left()) / slot) as usize;
        if let Some(bar) = bars.get(idx) {
            resp.on_hover_text(format!("{}\npest_count: {}", bar.category, bar.value));
        }
    }
}
