//! Chart Component
//!
//! Bar charts for the dashboard statistics, drawn on an HTML5 Canvas.

use leptos::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use tunimed::catalog::StatRow;

const GRID_LINES: u32 = 5;

/// Bar direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Bars grow upward, labels under the axis
    Vertical,
    /// Bars grow rightward, labels left of the axis
    Horizontal,
}

/// Bar chart over a fixed set of rows
#[component]
pub fn BarChart(
    title: &'static str,
    rows: &'static [StatRow],
    orientation: Orientation,
    /// Bar fill color
    #[prop(default = "#3B82F6")]
    color: &'static str,
) -> impl IntoView {
    let canvas_ref = create_node_ref::<html::Canvas>();

    create_effect(move |_| {
        if let Some(canvas) = canvas_ref.get() {
            draw_bars(&canvas, rows, orientation, color);
        }
    });

    view! {
        <div class="bg-white rounded-xl shadow p-6">
            <h2 class="text-lg font-semibold text-gray-900 mb-4">{title}</h2>
            <canvas
                node_ref=canvas_ref
                width="800"
                height="400"
                class="w-full h-64 md:h-80"
            />
        </div>
    }
}

/// Round the largest count up to a multiple of the grid step
fn axis_max(rows: &[StatRow]) -> u32 {
    let max = rows.iter().map(|r| r.count).max().unwrap_or(0);
    if max == 0 {
        return GRID_LINES;
    }
    let raw_step = max.div_ceil(GRID_LINES);
    let magnitude = 10u32.pow(raw_step.ilog10());
    let step = raw_step.div_ceil(magnitude) * magnitude;
    step * GRID_LINES
}

/// Shorten axis labels that would overlap their neighbours
fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        label.to_string()
    } else {
        let head: String = label.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{}…", head)
    }
}

fn draw_bars(canvas: &HtmlCanvasElement, rows: &[StatRow], orientation: Orientation, color: &str) {
    let ctx = match canvas.get_context("2d") {
        Ok(Some(ctx)) => match ctx.dyn_into::<CanvasRenderingContext2d>() {
            Ok(ctx) => ctx,
            Err(_) => return,
        },
        _ => return,
    };

    let width = canvas.width() as f64;
    let height = canvas.height() as f64;

    let (margin_left, margin_bottom) = match orientation {
        Orientation::Vertical => (50.0, 70.0),
        Orientation::Horizontal => (150.0, 30.0),
    };
    let margin_right = 20.0;
    let margin_top = 20.0;

    let chart_width = width - margin_left - margin_right;
    let chart_height = height - margin_top - margin_bottom;

    ctx.set_fill_style(&"#ffffff".into());
    ctx.fill_rect(0.0, 0.0, width, height);

    if rows.is_empty() {
        ctx.set_fill_style(&"#6b7280".into());
        ctx.set_font("16px sans-serif");
        let _ = ctx.fill_text("No data", width / 2.0 - 30.0, height / 2.0);
        return;
    }

    let max = axis_max(rows) as f64;

    // Value grid
    ctx.set_stroke_style(&"#e5e7eb".into()); // gray-200
    ctx.set_line_width(1.0);
    ctx.set_font("12px sans-serif");
    for i in 0..=GRID_LINES {
        let fraction = i as f64 / GRID_LINES as f64;
        let value = (max * fraction).round();
        ctx.begin_path();
        match orientation {
            Orientation::Vertical => {
                let y = margin_top + (1.0 - fraction) * chart_height;
                ctx.move_to(margin_left, y);
                ctx.line_to(width - margin_right, y);
                ctx.stroke();
                ctx.set_fill_style(&"#6b7280".into());
                let _ = ctx.fill_text(&format!("{}", value), 5.0, y + 4.0);
            }
            Orientation::Horizontal => {
                let x = margin_left + fraction * chart_width;
                ctx.move_to(x, margin_top);
                ctx.line_to(x, margin_top + chart_height);
                ctx.stroke();
                ctx.set_fill_style(&"#6b7280".into());
                let _ = ctx.fill_text(&format!("{}", value), x - 10.0, height - 10.0);
            }
        }
    }

    // Bars
    let slots = rows.len() as f64;
    for (idx, row) in rows.iter().enumerate() {
        let span = row.count as f64 / max;
        ctx.set_fill_style(&color.into());
        match orientation {
            Orientation::Vertical => {
                let slot = chart_width / slots;
                let x = margin_left + idx as f64 * slot + slot * 0.15;
                let bar_height = span * chart_height;
                ctx.fill_rect(x, margin_top + chart_height - bar_height, slot * 0.7, bar_height);

                ctx.save();
                let _ = ctx.translate(x + slot * 0.35, margin_top + chart_height + 12.0);
                let _ = ctx.rotate(-std::f64::consts::FRAC_PI_6);
                ctx.set_fill_style(&"#374151".into());
                ctx.set_text_align("right");
                let _ = ctx.fill_text(&truncate_label(row.label, 18), 0.0, 0.0);
                ctx.restore();
            }
            Orientation::Horizontal => {
                let slot = chart_height / slots;
                let y = margin_top + idx as f64 * slot + slot * 0.15;
                ctx.fill_rect(margin_left, y, span * chart_width, slot * 0.7);

                ctx.set_fill_style(&"#374151".into());
                ctx.set_text_align("right");
                let _ = ctx.fill_text(&truncate_label(row.label, 20), margin_left - 8.0, y + slot * 0.45);
                ctx.set_text_align("left");
            }
        }
    }
}
