use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Points};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::Theme;
use crate::catalog::{CollectionPoint, Coordinates};

/// Half of the initial region span around the device position, in degrees.
pub const MIN_HALF_SPAN: f64 = 0.007;

/// The geographic rectangle shown by the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: Coordinates,
    pub half_span: f64,
}

impl Viewport {
    /// Region centered on `center`, widened until every point is visible.
    pub fn fit(center: Coordinates, points: &[CollectionPoint]) -> Self {
        let farthest = points
            .iter()
            .map(|p| {
                (p.latitude - center.latitude)
                    .abs()
                    .max((p.longitude - center.longitude).abs())
            })
            .fold(0.0_f64, f64::max);

        Self {
            center,
            half_span: MIN_HALF_SPAN.max(farthest * 1.1),
        }
    }

    /// Centroid of the points, used when the device position is unknown.
    pub fn centroid(points: &[CollectionPoint]) -> Option<Coordinates> {
        if points.is_empty() {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let n = points.len() as f64;
        let latitude = points.iter().map(|p| p.latitude).sum::<f64>() / n;
        let longitude = points.iter().map(|p| p.longitude).sum::<f64>() / n;
        Some(Coordinates::new(latitude, longitude))
    }

    pub fn x_bounds(&self) -> [f64; 2] {
        [
            self.center.longitude - self.half_span,
            self.center.longitude + self.half_span,
        ]
    }

    pub fn y_bounds(&self) -> [f64; 2] {
        [
            self.center.latitude - self.half_span,
            self.center.latitude + self.half_span,
        ]
    }
}

/// Draw the points around `position`.
///
/// Without a fix the map centers on the loaded points; with neither there is
/// nothing to draw and a placeholder is shown instead.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    theme: &Theme,
    position: Coordinates,
    points: &[CollectionPoint],
    highlighted: Option<usize>,
) {
    let block = Block::default()
        .title(" Map ")
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(theme.border));

    let has_fix = !position.is_unset();
    let center = if has_fix {
        Some(position)
    } else {
        Viewport::centroid(points)
    };

    let Some(center) = center else {
        let placeholder = Paragraph::new(Line::from(Span::styled(
            "No location fix and no points to show",
            Style::default().fg(theme.muted),
        )))
        .block(block)
        .wrap(Wrap { trim: true });
        frame.render_widget(placeholder, area);
        return;
    };

    let viewport = Viewport::fit(center, points);
    let coords: Vec<(f64, f64)> = points.iter().map(|p| (p.longitude, p.latitude)).collect();
    let highlighted = highlighted.and_then(|i| points.get(i));

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds(viewport.x_bounds())
        .y_bounds(viewport.y_bounds())
        .paint(|ctx| {
            ctx.draw(&Points {
                coords: &coords,
                color: theme.accent,
            });
            if has_fix {
                ctx.print(
                    position.longitude,
                    position.latitude,
                    Span::styled("◉", Style::default().fg(theme.position)),
                );
            }
            for point in points {
                let style = if highlighted.is_some_and(|h| h.id == point.id) {
                    Style::default()
                        .fg(theme.highlight)
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else {
                    Style::default().fg(theme.accent)
                };
                ctx.print(
                    point.longitude,
                    point.latitude,
                    Span::styled(format!("● {}", point.name), style),
                );
            }
        });

    frame.render_widget(canvas, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(id: u32, latitude: f64, longitude: f64) -> CollectionPoint {
        CollectionPoint {
            id,
            name: format!("Point {id}"),
            image: String::new(),
            image_url: String::new(),
            latitude,
            longitude,
            city: "Sao Paulo".to_string(),
            uf: "SP".to_string(),
            whatsapp: String::new(),
            email: String::new(),
        }
    }

    #[test]
    fn test_viewport_keeps_minimum_span() {
        let center = Coordinates::new(-23.55, -46.63);
        let viewport = Viewport::fit(center, &[point(1, -23.551, -46.631)]);
        assert!((viewport.half_span - MIN_HALF_SPAN).abs() < f64::EPSILON);
    }

    #[test]
    fn test_viewport_grows_to_include_far_points() {
        let center = Coordinates::new(-23.55, -46.63);
        let viewport = Viewport::fit(center, &[point(1, -23.65, -46.63)]);

        let [south, north] = viewport.y_bounds();
        assert!(south < -23.65 && north > -23.55);
    }

    #[test]
    fn test_centroid() {
        assert_eq!(Viewport::centroid(&[]), None);

        let centroid = Viewport::centroid(&[point(1, -10.0, -40.0), point(2, -20.0, -50.0)]).unwrap();
        assert!((centroid.latitude + 15.0).abs() < 1e-9);
        assert!((centroid.longitude + 45.0).abs() < 1e-9);
    }
}
