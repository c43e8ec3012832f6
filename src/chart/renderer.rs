//! Pie, bar, grouped bar and line charts drawn with plotters.

use super::{slugify, Chart, ChartKind, ChartSize};
use crate::analysis::{Aggregate, Pivot};
use crate::error::RenderError;
use crate::models::Key;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::debug;

const FONT: &str = "sans-serif";
const BAR_COLOR: RGBColor = RGBColor(31, 119, 180);
/// Category labels are turned vertical beyond this many bars.
const ROTATE_LABELS_AFTER: usize = 6;
/// Width of one bar (or one cluster) in category units.
const BAR_WIDTH: f64 = 0.8;
const PIE_START_DEGREES: f64 = 90.0;

type Canvas<'b> = DrawingArea<SVGBackend<'b>, Shift>;
type CategoryChart<'a, 'b> = ChartContext<'a, SVGBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// One slice per group, counter-clockwise from 12 o'clock, labelled with
/// its share to two decimals.
pub fn pie(aggregate: &Aggregate, title: &str, size: ChartSize) -> Result<Chart, RenderError> {
    if aggregate.is_empty() {
        return Err(RenderError::EmptySeries(title.to_string()));
    }
    let total = aggregate.total();
    if total <= 0.0 || aggregate.entries.iter().any(|e| e.value < 0.0) {
        return Err(RenderError::InvalidPieTotal(title.to_string()));
    }

    let mut labels = Vec::with_capacity(aggregate.len());
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (size.width, size.height)).into_drawing_area();
        root.fill(&WHITE)?;
        let area = root.titled(title, (FONT, 20.0))?;

        let (w, h) = area.dim_in_pixel();
        let center = (w as i32 / 2, h as i32 / 2);
        let radius = f64::from(w.min(h)) * 0.35;

        let name_style = centered_text(12.0);
        let share_style = centered_text(11.0);

        let mut start = PIE_START_DEGREES;
        for (i, entry) in aggregate.entries.iter().enumerate() {
            let share = entry.value / total;
            let sweep = share * 360.0;
            let color = Palette99::pick(i).to_rgba();

            area.draw(&Polygon::new(
                slice_points(center, radius, start, sweep),
                color.filled(),
            ))?;

            let mid = (start + sweep / 2.0).to_radians();
            let percent = format!("{:.2}%", share * 100.0);
            area.draw(&Text::new(
                entry.label(),
                polar(center, radius * 1.18, mid),
                name_style.clone(),
            ))?;
            area.draw(&Text::new(
                percent.clone(),
                polar(center, radius * 0.6, mid),
                share_style.clone(),
            ))?;

            labels.push(format!("{}: {}", entry.label(), percent));
            start += sweep;
        }

        root.present()?;
    }

    Ok(finish(ChartKind::Pie, title, labels, svg))
}

/// One bar per group in the aggregate's order, each annotated with its
/// value rounded to a whole number.
pub fn bar(
    aggregate: &Aggregate,
    title: &str,
    x_label: &str,
    y_label: &str,
    size: ChartSize,
) -> Result<Chart, RenderError> {
    if aggregate.is_empty() {
        return Err(RenderError::EmptySeries(title.to_string()));
    }

    let names: Vec<String> = aggregate.entries.iter().map(|e| e.label()).collect();
    let values: Vec<f64> = aggregate.entries.iter().map(|e| e.value).collect();
    let (y_min, y_max) = value_range(values.iter().copied());
    let rotate = names.len() > ROTATE_LABELS_AFTER;

    let labels = names
        .iter()
        .zip(&values)
        .map(|(name, v)| format!("{}: {:.0}", name, v))
        .collect();

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (size.width, size.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = category_chart(&root, title, names.len(), y_min, y_max, rotate)?;
        draw_category_mesh(&mut chart, x_label, y_label)?;

        chart.draw_series(values.iter().enumerate().map(|(i, v)| {
            let x = i as f64;
            Rectangle::new(
                [(x - BAR_WIDTH / 2.0, 0.0), (x + BAR_WIDTH / 2.0, *v)],
                BAR_COLOR.filled(),
            )
        }))?;

        let value_style =
            TextStyle::from((FONT, 10.0).into_font()).pos(Pos::new(HPos::Center, VPos::Bottom));
        chart.draw_series(values.iter().enumerate().map(|(i, v)| {
            Text::new(format!("{:.0}", v), (i as f64, *v), value_style.clone())
        }))?;

        draw_category_labels(&root, &chart, &names, y_min, rotate)?;
        root.present()?;
    }

    Ok(finish(ChartKind::Bar, title, labels, svg))
}

/// One cluster per pivot row with a sub-bar per series and a legend.
/// Missing cells leave a gap.
pub fn grouped_bar(
    pivot: &Pivot,
    title: &str,
    x_label: &str,
    y_label: &str,
    size: ChartSize,
) -> Result<Chart, RenderError> {
    if pivot.rows.is_empty() || pivot.series.is_empty() {
        return Err(RenderError::EmptySeries(title.to_string()));
    }

    let names: Vec<String> = pivot.rows.iter().map(Key::to_string).collect();
    let (y_min, y_max) = value_range(pivot.values.iter().flatten().flatten().copied());
    let rotate = names.len() > ROTATE_LABELS_AFTER;
    let sub_width = BAR_WIDTH / pivot.series.len() as f64;

    let mut labels = Vec::new();
    for (name, row) in names.iter().zip(&pivot.values) {
        for (series, cell) in pivot.series.iter().zip(row) {
            if let Some(v) = cell {
                labels.push(format!("{} / {}: {:.0}", name, series, v));
            }
        }
    }

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (size.width, size.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = category_chart(&root, title, names.len(), y_min, y_max, rotate)?;
        draw_category_mesh(&mut chart, x_label, y_label)?;

        for (j, series) in pivot.series.iter().enumerate() {
            let color = Palette99::pick(j).to_rgba();
            let offset = -BAR_WIDTH / 2.0 + j as f64 * sub_width;

            chart
                .draw_series(
                    pivot
                        .values
                        .iter()
                        .enumerate()
                        .filter_map(|(i, row)| row[j].map(|v| (i as f64 + offset, v)))
                        .map(|(x, v)| {
                            Rectangle::new([(x, 0.0), (x + sub_width, v)], color.filled())
                        }),
                )?
                .label(series.to_string())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;

        draw_category_labels(&root, &chart, &names, y_min, rotate)?;
        root.present()?;
    }

    Ok(finish(ChartKind::GroupedBar, title, labels, svg))
}

/// Points in ascending key order joined by a line, with a marker at each
/// point. Keys must be integers.
pub fn line(
    aggregate: &Aggregate,
    title: &str,
    x_label: &str,
    y_label: &str,
    size: ChartSize,
) -> Result<Chart, RenderError> {
    if aggregate.is_empty() {
        return Err(RenderError::EmptySeries(title.to_string()));
    }

    let mut points: Vec<(i64, f64)> = aggregate
        .entries
        .iter()
        .map(|e| match e.key.as_slice() {
            [key] => key.as_int().map(|x| (x, e.value)),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| RenderError::NonNumericAxis(title.to_string()))?;
    points.sort_by_key(|(x, _)| *x);

    let x_min = points[0].0 - 1;
    let x_max = points[points.len() - 1].0 + 1;
    let (y_min, y_max) = value_range(points.iter().map(|(_, y)| *y));

    let labels = points
        .iter()
        .map(|(x, y)| format!("{}: {:.0}", x, y))
        .collect();

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (size.width, size.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, (FONT, 20.0))
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

        chart
            .configure_mesh()
            .x_labels(points.len() + 2)
            .x_label_formatter(&|x| x.to_string())
            .y_label_formatter(&|v| format!("{:.0}", v))
            .x_desc(x_label)
            .y_desc(y_label)
            .draw()?;

        chart.draw_series(LineSeries::new(
            points.iter().copied(),
            BAR_COLOR.stroke_width(2),
        ))?;
        chart.draw_series(
            points
                .iter()
                .map(|(x, y)| Circle::new((*x, *y), 5, BAR_COLOR.filled())),
        )?;

        root.present()?;
    }

    Ok(finish(ChartKind::Line, title, labels, svg))
}

fn finish(kind: ChartKind, title: &str, labels: Vec<String>, svg: String) -> Chart {
    debug!("Rendered {:?} chart \"{}\" ({} bytes)", kind, title, svg.len());
    Chart {
        kind,
        title: title.to_string(),
        slug: slugify(title),
        labels,
        svg,
    }
}

fn centered_text(size: f64) -> TextStyle<'static> {
    TextStyle::from((FONT, size).into_font()).pos(Pos::new(HPos::Center, VPos::Center))
}

/// Y range covering zero and every value, with headroom for labels.
fn value_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values.fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if lo == hi {
        return (0.0, 1.0);
    }
    (lo * 1.15, hi * 1.15)
}

fn category_chart<'a, 'b>(
    root: &'a Canvas<'b>,
    title: &str,
    count: usize,
    y_min: f64,
    y_max: f64,
    rotate: bool,
) -> Result<CategoryChart<'a, 'b>, RenderError> {
    let chart = ChartBuilder::on(root)
        .caption(title, (FONT, 20.0))
        .margin(15)
        .x_label_area_size(if rotate { 160 } else { 50 })
        .y_label_area_size(80)
        .build_cartesian_2d(-0.5..(count as f64 - 0.5), y_min..y_max)?;
    Ok(chart)
}

/// Axes and y grid. Category names are drawn separately so they sit
/// exactly under each bar.
fn draw_category_mesh(
    chart: &mut CategoryChart<'_, '_>,
    x_label: &str,
    y_label: &str,
) -> Result<(), RenderError> {
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_label_formatter(&|_| String::new())
        .y_label_formatter(&|v| format!("{:.0}", v))
        .x_desc(x_label)
        .y_desc(y_label)
        .draw()?;
    Ok(())
}

fn draw_category_labels(
    root: &Canvas<'_>,
    chart: &CategoryChart<'_, '_>,
    names: &[String],
    y_min: f64,
    rotate: bool,
) -> Result<(), RenderError> {
    let style = if rotate {
        TextStyle::from((FONT, 10.0).into_font())
            .transform(FontTransform::Rotate90)
            .pos(Pos::new(HPos::Left, VPos::Center))
    } else {
        TextStyle::from((FONT, 11.0).into_font()).pos(Pos::new(HPos::Center, VPos::Top))
    };

    for (i, name) in names.iter().enumerate() {
        let (x, y) = chart.backend_coord(&(i as f64, y_min));
        root.draw(&Text::new(name.as_str(), (x, y + 6), style.clone()))?;
    }
    Ok(())
}

fn polar(center: (i32, i32), radius: f64, angle: f64) -> (i32, i32) {
    (
        center.0 + (radius * angle.cos()).round() as i32,
        center.1 - (radius * angle.sin()).round() as i32,
    )
}

fn slice_points(center: (i32, i32), radius: f64, start: f64, sweep: f64) -> Vec<(i32, i32)> {
    let steps = (sweep.ceil() as usize).max(1);
    let mut points = Vec::with_capacity(steps + 2);
    points.push(center);
    for s in 0..=steps {
        let angle = (start + sweep * s as f64 / steps as f64).to_radians();
        points.push(polar(center, radius, angle));
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{sort_by_value_desc, sum_by, GroupEntry, Stat};
    use crate::dataset::{load_dataset, normalize, DEFAULT_DELIMITER};
    use crate::models::{Column, Dataset};
    use std::path::Path;

    const SIZE: ChartSize = ChartSize {
        width: 800,
        height: 500,
    };

    fn fixture() -> Dataset {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/sales_sample.csv");
        normalize(load_dataset(&path, DEFAULT_DELIMITER).unwrap())
    }

    fn years(points: &[(i64, f64)]) -> Aggregate {
        Aggregate {
            group_keys: vec![Column::OutletEstablishmentYear],
            value_column: Column::Sales,
            stat: Stat::Sum,
            entries: points
                .iter()
                .map(|(y, v)| GroupEntry {
                    key: vec![Key::Int(*y)],
                    value: *v,
                })
                .collect(),
        }
    }

    #[test]
    fn test_pie_percentages() {
        let agg = sum_by(&fixture(), &[Column::ItemFatContent], Column::Sales).unwrap();
        let chart = pie(&agg, "Sales by Fat Content", SIZE).unwrap();

        assert_eq!(chart.kind, ChartKind::Pie);
        assert_eq!(chart.labels, vec!["Low Fat: 71.24%", "Regular: 28.76%"]);
        assert_eq!(chart.file_name(), "sales-by-fat-content.svg");
        assert!(chart.svg.contains("<svg"));
        assert!(chart.svg.contains("71.24%"));
    }

    #[test]
    fn test_pie_rejects_zero_total() {
        let agg = years(&[(2000, 0.0), (2001, 0.0)]);
        assert!(matches!(
            pie(&agg, "Zero", SIZE),
            Err(RenderError::InvalidPieTotal(_))
        ));
        assert!(matches!(
            pie(&years(&[]), "Empty", SIZE),
            Err(RenderError::EmptySeries(_))
        ));
    }

    #[test]
    fn test_bar_keeps_given_order() {
        let agg = sort_by_value_desc(
            &sum_by(&fixture(), &[Column::ItemType], Column::Sales).unwrap(),
        );
        let before = agg.clone();
        let chart = bar(&agg, "Sales by Item Type", "Item Type", "Sales", SIZE).unwrap();

        assert_eq!(agg, before);
        assert_eq!(chart.labels.len(), 7);
        assert_eq!(chart.labels[0], "Frozen Foods: 319");
        assert_eq!(chart.labels[6], "Soft Drinks: 55");
        assert!(chart.svg.contains("Frozen Foods"));
    }

    #[test]
    fn test_grouped_bar_skips_missing_cells() {
        let agg = sum_by(
            &fixture(),
            &[Column::ItemType, Column::ItemFatContent],
            Column::Sales,
        )
        .unwrap();
        let pivot = agg.pivot(0).unwrap();
        let chart = grouped_bar(
            &pivot,
            "Sales by Item Type and Fat Content",
            "Item Type",
            "Total Sales",
            SIZE,
        )
        .unwrap();

        assert_eq!(chart.kind, ChartKind::GroupedBar);
        assert_eq!(chart.labels.len(), agg.len());
        assert!(chart.labels.contains(&"Canned / Low Fat: 182".to_string()));
        assert!(!chart.labels.iter().any(|l| l.starts_with("Household / Regular")));
        assert!(chart.svg.contains("Regular"));
    }

    #[test]
    fn test_line_sorts_by_year() {
        let agg = years(&[(2020, 10.0), (1998, 30.0), (2011, 20.0)]);
        let chart = line(&agg, "Total Sales by Outlet Establishment", "Year", "Sales", SIZE).unwrap();

        assert_eq!(chart.labels, vec!["1998: 30", "2011: 20", "2020: 10"]);
        // Input order untouched
        assert_eq!(agg.entries[0].key, vec![Key::Int(2020)]);
    }

    #[test]
    fn test_line_needs_integer_keys() {
        let agg = sum_by(&fixture(), &[Column::OutletType], Column::Sales).unwrap();
        assert!(matches!(
            line(&agg, "Bad", "x", "y", SIZE),
            Err(RenderError::NonNumericAxis(_))
        ));
    }

    #[test]
    fn test_bar_labels_rotate_past_six_categories() {
        let seven = sum_by(&fixture(), &[Column::ItemType], Column::Sales).unwrap();
        assert_eq!(seven.len(), 7);
        let three = sum_by(&fixture(), &[Column::OutletType], Column::Sales).unwrap();
        assert_eq!(three.len(), 3);

        let wide = bar(&seven, "Sales by Item Type", "Item Type", "Sales", SIZE).unwrap();
        let narrow = bar(&three, "Sales by Outlet Type", "Outlet Type", "Sales", SIZE).unwrap();

        // One rotation per category label plus the y-axis title
        assert_eq!(wide.svg.matches("rotate").count(), 7 + 1);
        assert_eq!(narrow.svg.matches("rotate").count(), 1);
    }

    #[test]
    fn test_pie_slices_start_at_top_counter_clockwise() {
        let center = (100, 100);
        let points = slice_points(center, 50.0, PIE_START_DEGREES, 90.0);

        assert_eq!(points[0], center);
        // First edge points straight up, the sweep ends on the left
        assert_eq!(points[1], (100, 50));
        assert_eq!(points[points.len() - 1], (50, 100));
    }

    #[test]
    fn test_line_marks_every_point() {
        let agg = years(&[(1998, 30.0), (2011, 20.0), (2016, 25.0), (2020, 10.0)]);
        let chart = line(&agg, "Total Sales by Outlet Establishment", "Year", "Sales", SIZE).unwrap();

        assert_eq!(chart.svg.matches("<circle").count(), agg.len());
    }

    #[test]
    fn test_renders_are_independent() {
        let agg = sum_by(&fixture(), &[Column::OutletLocationType], Column::Sales).unwrap();
        let first = pie(&agg, "Sales by Outlet Location", SIZE).unwrap();
        let _other = bar(&agg, "Something Else", "x", "y", SIZE).unwrap();
        let second = pie(&agg, "Sales by Outlet Location", SIZE).unwrap();

        assert_eq!(first.svg, second.svg);
        assert!(!first.svg.contains("Something Else"));
    }
}
