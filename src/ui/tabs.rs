use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::{App, View};

pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let current = app.view.tab_index();
    let titles: Vec<Line> = View::tabs()
        .iter()
        .map(|v| {
            let style = if v.tab_index() == current {
                Style::default()
                    .fg(Color::Rgb(150, 240, 190))
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Rgb(120, 120, 140))
            };
            Line::from(Span::styled(v.title(), style))
        })
        .collect();

    let corner = if app.view == View::Playing {
        format!(" Score {} ", app.game().get_score())
    } else {
        format!(" Level {} ", app.store.progress().level())
    };
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Rgb(70, 160, 140)))
                .border_type(BorderType::Rounded)
                .title(" 🌿 StressCade ")
                .title_style(
                    Style::default()
                        .fg(Color::Rgb(150, 240, 190))
                        .add_modifier(Modifier::BOLD),
                )
                .title_top(Line::from(corner).right_aligned()),
        )
        .select(current)
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Rgb(150, 240, 190))
                .add_modifier(Modifier::BOLD),
        )
        .divider(Span::styled(" │ ", Style::default().fg(Color::Rgb(60, 60, 80))));

    frame.render_widget(tabs, area);
}
