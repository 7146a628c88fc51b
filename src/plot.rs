/*!
Chart rendering for a [`DensityPair`].

Both curves are drawn as line series against the grid on one chart. A third curve,
typically a histogram of sampler output, can be overlaid. Charts render to an
in-memory SVG string or to a file whose extension (`svg` or `png`) picks the backend.

Only the SVG backend writes text (caption, tick labels, legend). The crate builds plotters
without a font engine, so PNG charts carry the curves and the mesh only.

```rust
use tempered_density::plot::render_svg;
use tempered_density::{DensityPair, PlotConfig};

let config = PlotConfig::default();
let pair = DensityPair::from_config(&config).unwrap();
let svg = render_svg(&pair, None, &config).unwrap();
assert!(svg.contains("<svg"));
```
*/

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::config::PlotConfig;
use crate::density::{DensityCurve, DensityPair};
use crate::error::{DensityError, Result};

fn plot_err<E: std::fmt::Display>(e: E) -> DensityError {
    DensityError::Plot(e.to_string())
}

/// Renders the chart into an SVG document held in memory.
pub fn render_svg(
    pair: &DensityPair,
    overlay: Option<&DensityCurve>,
    config: &PlotConfig,
) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (config.width, config.height))
            .into_drawing_area();
        draw_chart(&root, pair, overlay, Some(&config.caption))?;
    }
    Ok(svg)
}

/// Renders the chart to `config.output`.
pub fn render_to_file(
    pair: &DensityPair,
    overlay: Option<&DensityCurve>,
    config: &PlotConfig,
) -> Result<()> {
    let size = (config.width, config.height);
    let extension = config
        .output
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("svg") => {
            let root = SVGBackend::new(&config.output, size).into_drawing_area();
            draw_chart(&root, pair, overlay, Some(&config.caption))?;
        }
        Some("png") => {
            let root = BitMapBackend::new(&config.output, size).into_drawing_area();
            draw_chart(&root, pair, overlay, None)?;
        }
        _ => {
            return Err(DensityError::Plot(format!(
                "unsupported chart format: {}",
                config.output.display()
            )))
        }
    }
    log::info!("saved chart to {}", config.output.display());
    Ok(())
}

/// Draws the chart. With `caption` set to `None` no text at all is drawn.
fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    pair: &DensityPair,
    overlay: Option<&DensityCurve>,
    caption: Option<&str>,
) -> Result<()> {
    if let Some(curve) = overlay {
        if curve.len() != pair.grid.len() {
            return Err(DensityError::LengthMismatch {
                curve: curve.len(),
                grid: pair.grid.len(),
            });
        }
    }

    let mut y_max = pair.peak()?;
    if let Some(curve) = overlay {
        y_max = y_max.max(curve.max()?);
    }
    let (x_min, x_max) = pair.grid.bounds();

    let with_text = caption.is_some();
    let n_labels = if with_text { 10 } else { 0 };

    root.fill(&WHITE).map_err(plot_err)?;
    let mut builder = ChartBuilder::on(root);
    if let Some(caption) = caption {
        builder.caption(caption, ("sans-serif", 40));
    }
    let mut chart = builder
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, 0.0..y_max * 1.1)
        .map_err(plot_err)?;

    let mut mesh = chart.configure_mesh();
    mesh.x_labels(n_labels)
        .y_labels(n_labels)
        .light_line_style(WHITE.mix(0.8))
        .bold_line_style(BLACK.mix(0.3));
    if with_text {
        mesh.x_desc("x").y_desc("density");
    }
    mesh.draw().map_err(plot_err)?;

    if let Some(curve) = overlay {
        // Step outline of the histogram cells.
        let step = pair.grid.step();
        let outline = pair
            .grid
            .points()
            .iter()
            .zip(curve.values())
            .flat_map(|(&x, &h)| [(x, h), (x + step, h)]);
        chart
            .draw_series(LineSeries::new(outline, RGBAColor(70, 130, 180, 0.6)))
            .map_err(plot_err)?
            .label(curve.label())
            .legend(|(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], RGBAColor(70, 130, 180, 0.6))
            });
    }

    chart
        .draw_series(LineSeries::new(
            pair.rows().map(|(x, a, _)| (x, a)),
            BLACK.stroke_width(2),
        ))
        .map_err(plot_err)?
        .label(pair.base.label())
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK.stroke_width(2)));

    chart
        .draw_series(LineSeries::new(
            pair.rows().map(|(x, _, b)| (x, b)),
            RED.stroke_width(2),
        ))
        .map_err(plot_err)?
        .label(pair.tempered.label())
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));

    if with_text {
        chart
            .configure_series_labels()
            .border_style(BLACK)
            .background_style(WHITE.mix(0.9))
            .draw()
            .map_err(plot_err)?;
    }

    root.present().map_err(plot_err)?;
    Ok(())
}
