//! Plain-text run report

use anyhow::Result;
use minijinja::{context, Environment};
use crate::field::Field;
use crate::session::SimulationSession;

const REPORT_TEMPLATE: &str = r#"Tremor run report
{{ title }}

Generated: {{ timestamp }}

Grid:       {{ rows }} x {{ cols }} cells ({{ km_per_cell }} km per cell)
Step:       {{ fixed_step }} s
Ticks:      {{ ticks }} ({{ simulated_time }} s simulated)

Media:
{% for medium in media %}  {{ medium.id }} {{ medium.name }}: {{ medium.cells }} cells, {{ medium.color }}{% if medium.reflective %} (reflective){% endif %}
{% endfor %}
Origins:
{% for origin in origins %}  ({{ origin.x }}, {{ origin.y }}) magnitude {{ origin.mag }}
{% else %}  none
{% endfor %}
Peak |P displacement|: {{ peak_p }}
Peak |S displacement|: {{ peak_s }}
Velocity L1:           {{ velocity_l1 }}

Seismographs:
{% for probe in probes %}  {{ probe.label }} at ({{ probe.x }}, {{ probe.y }}): {{ probe.samples }} samples, latest {{ probe.latest }}, peak {{ probe.peak }}
{% else %}  none
{% endfor %}"#;

/// Summarize the current session state
pub fn render_report(session: &SimulationSession, title: &str) -> Result<String> {
    let mut env = Environment::new();
    env.add_template("report", REPORT_TEMPLATE)?;
    let template = env.get_template("report")?;

    let counts = session.grid().histogram();
    let media: Vec<_> = session
        .catalog()
        .iter()
        .filter(|m| counts[usize::from(m.id)] > 0)
        .map(|m| {
            serde_json::json!({
                "id": m.id,
                "name": m.name,
                "cells": counts[usize::from(m.id)],
                "color": m.color.to_hex(),
                "reflective": m.reflective,
            })
        })
        .collect();

    let origins: Vec<_> = session
        .origins()
        .iter()
        .map(|o| {
            serde_json::json!({
                "x": o.x,
                "y": o.y,
                "mag": format!("{:.2}", o.magnitude),
            })
        })
        .collect();

    let probes: Vec<_> = session
        .probes()
        .iter()
        .map(|p| {
            let stats = p.stats();
            serde_json::json!({
                "label": p.label,
                "x": p.x,
                "y": p.y,
                "samples": stats.samples,
                "latest": format!("{:.6}", stats.latest),
                "peak": format!("{:.6}", stats.peak),
            })
        })
        .collect();

    let config = session.config();
    let fields = session.fields();
    let output = template.render(context! {
        title => title,
        timestamp => chrono::Utc::now().to_rfc3339(),
        rows => config.rows,
        cols => config.cols,
        km_per_cell => config.km_per_cell,
        fixed_step => config.fixed_step,
        ticks => session.ticks(),
        simulated_time => format!("{:.2}", session.simulated_time()),
        media => media,
        origins => origins,
        peak_p => format!("{:.6}", fields.peak_abs(Field::PDisplacement)),
        peak_s => format!("{:.6}", fields.peak_abs(Field::SDisplacement)),
        velocity_l1 => format!("{:.6}", fields.velocity_l1()),
        probes => probes,
    })?;

    Ok(output)
}
