use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Widget, Wrap},
    Frame,
};
use tui_big_text::{BigText, PixelSize};

use crate::app::App;
use crate::display::{
    classify_status, derive_display, team_roles, DerivationError, GameDisplayState,
    PredictedSide, StatusCategory, VisualRole,
};
use crate::feed::{FeedState, StatusFilter};
use crate::model::RawPredictionRecord;

const TITLE: &str = "NBA Game Predictor";
const TAGLINE: &str = "64.8% accuracy • Powered by ML";

fn role_color(role: VisualRole) -> Color {
    match role {
        VisualRole::Home => Color::Blue,
        VisualRole::Away => Color::Red,
    }
}

fn emphasis_color(role: VisualRole) -> Color {
    match role {
        VisualRole::Home => Color::LightBlue,
        VisualRole::Away => Color::LightRed,
    }
}

fn status_color(category: StatusCategory) -> Color {
    match category {
        StatusCategory::Live => Color::Red,
        StatusCategory::Final => Color::Gray,
        StatusCategory::Scheduled => Color::White,
    }
}

pub fn format_confidence(confidence: f64) -> String {
    format!("{}%", confidence)
}

pub fn ui(f: &mut Frame, app: &mut App) {
    let size = f.area();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(1)].as_ref())
        .split(size);

    draw_header(f, app, rows[0]);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)].as_ref())
        .split(rows[1]);

    draw_sidebar(f, app, chunks[0]);
    draw_main_panel(f, app, chunks[1]);

    let keys = Paragraph::new(" q quit  j/k move  f filter  r refresh").style(Style::default().fg(Color::DarkGray));
    f.render_widget(keys, rows[2]);
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let updated = match app.fetched_at {
        Some(at) => format!("updated {}", at.format("%H:%M:%S")),
        None => String::new(),
    };
    let lines = vec![
        Line::from(Span::styled(TITLE, Style::default().add_modifier(Modifier::BOLD))),
        Line::from(vec![
            Span::styled(TAGLINE, Style::default().fg(Color::Gray)),
            Span::raw("   "),
            Span::styled(updated, Style::default().fg(Color::DarkGray)),
        ]),
    ];
    let header = Paragraph::new(lines).block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(header, area);
}

fn draw_sidebar(f: &mut Frame, app: &mut App, area: Rect) {
    let items: Vec<ListItem> = app
        .filtered_records()
        .iter()
        .map(|game| {
            let category = classify_status(&game.time);
            let flag = if derive_display(game).is_err() { "! " } else { "" };
            let line = Line::from(vec![
                Span::styled(flag, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                Span::raw(format!("{} @ {}  ", game.away_team, game.home_team)),
                Span::styled(format!("[{}]", game.time), Style::default().fg(status_color(category))),
            ]);
            ListItem::new(line)
        })
        .collect();

    let games_list = List::new(items)
        .block(Block::default().title(app.filter.title()).borders(Borders::ALL))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray).fg(Color::White));

    f.render_stateful_widget(games_list, area, &mut app.state);
}

fn draw_main_panel(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL);
    let inner_area = block.inner(area);
    f.render_widget(block, area);

    match &app.feed {
        FeedState::Idle | FeedState::Loading => {
            draw_message(f, inner_area, vec![Line::from("Loading predictions...").fg(Color::Gray)]);
        }
        FeedState::Failed(err) => {
            draw_message(
                f,
                inner_area,
                vec![
                    Line::from("Predictions unavailable").fg(Color::Red).add_modifier(Modifier::BOLD),
                    Line::from(""),
                    Line::from(err.to_string()).fg(Color::Gray),
                    Line::from(""),
                    Line::from("press r to retry").fg(Color::DarkGray),
                ],
            );
        }
        FeedState::Loaded(records) if records.is_empty() => {
            draw_message(f, inner_area, vec![Line::from("No predictions available.").fg(Color::Gray)]);
        }
        FeedState::Loaded(_) => match app.selected_record() {
            Some(game) => draw_game(f, game, inner_area),
            None if app.filter != StatusFilter::All => {
                draw_message(f, inner_area, vec![Line::from("No games match this filter.").fg(Color::Gray)]);
            }
            None => {
                draw_message(f, inner_area, vec![Line::from("No game selected")]);
            }
        },
    }
}

fn draw_message(f: &mut Frame, area: Rect, lines: Vec<Line>) {
    let top = area.height.saturating_sub(lines.len() as u16) / 2;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(top), Constraint::Min(0)].as_ref())
        .split(area);
    let p = Paragraph::new(lines).alignment(Alignment::Center).wrap(Wrap { trim: true });
    f.render_widget(p, rows[1]);
}

fn draw_game(f: &mut Frame, game: &RawPredictionRecord, area: Rect) {
    let derived = derive_display(game);
    let scores_visible = derived.as_ref().map_or_else(
        |_| crate::display::scores_visible(game),
        |state| state.scores_visible,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(11), // Scoreboard Header
            Constraint::Length(1),  // Spacer
            Constraint::Length(7),  // Prediction
            Constraint::Length(3),  // Confidence Meter
            Constraint::Min(0),
        ].as_ref())
        .split(area);

    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40), // Away
            Constraint::Percentage(20), // VS/Clock
            Constraint::Percentage(40), // Home
        ].as_ref())
        .split(chunks[0]);

    let away_score = game.away_score.filter(|_| scores_visible);
    let home_score = game.home_score.filter(|_| scores_visible);
    let (home_role, away_role) = derived.as_ref().map_or_else(
        |_| team_roles(),
        |state| {
            let roles = state.roles();
            (roles.home, roles.away)
        },
    );
    draw_team(f, &game.away_team, away_score, away_role, header_chunks[0]);
    draw_team(f, &game.home_team, home_score, home_role, header_chunks[2]);

    // Middle
    let category = classify_status(&game.time);
    let mid_text = vec![
        Line::from(""),
        Line::from(Span::styled("@", Style::default().add_modifier(Modifier::ITALIC))),
        Line::from(""),
        Line::from(Span::styled(
            game.time.clone(),
            Style::default().fg(status_color(category)).add_modifier(Modifier::BOLD),
        )),
        Line::from(category.label()),
    ];
    let mid_p = Paragraph::new(mid_text).alignment(Alignment::Center);
    f.render_widget(mid_p, header_chunks[1]);

    match derived {
        Ok(state) => {
            draw_prediction(f, game, &state, chunks[2]);
            let meter = ConfidenceMeter {
                side: state.predicted_side,
                confidence: game.confidence,
            };
            f.render_widget(meter, chunks[3]);
        }
        Err(err) => draw_unknown_prediction(f, &err, chunks[2]),
    }
}

fn draw_team(f: &mut Frame, name: &str, score: Option<u32>, role: VisualRole, area: Rect) {
    f.render_widget(Block::default().bg(role_color(role)), area);

    let text_area = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Spacer
            Constraint::Length(2), // Name
            Constraint::Length(4), // Score
            Constraint::Min(0),
        ].as_ref())
        .split(area);

    let name_p = Paragraph::new(name.to_string())
        .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(name_p, text_area[1]);

    let Some(score) = score else { return };
    let score_str = score.to_string();
    if text_area[2].width < 25 {
        let score_p = Paragraph::new(score_str)
            .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center);
        f.render_widget(score_p, text_area[2]);
    } else {
        let score_text = BigText::builder()
            .pixel_size(PixelSize::Quadrant)
            .style(Style::default().fg(Color::White))
            .lines(vec![score_str.into()])
            .alignment(Alignment::Center)
            .build();
        f.render_widget(score_text, text_area[2]);
    }
}

fn draw_prediction(f: &mut Frame, game: &RawPredictionRecord, state: &GameDisplayState, area: Rect) {
    let color = emphasis_color(state.roles().emphasized);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Label
            Constraint::Length(4), // Winner
            Constraint::Length(1), // Confidence
            Constraint::Min(0),
        ].as_ref())
        .split(area);

    let label = Paragraph::new("Predicted winner")
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::UNDERLINED))
        .alignment(Alignment::Center);
    f.render_widget(label, rows[0]);

    // BigText needs roughly four columns per character
    if (rows[1].width as usize) < game.prediction.chars().count() * 4 + 4 {
        let winner = Paragraph::new(game.prediction.clone())
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center);
        f.render_widget(winner, rows[1]);
    } else {
        let winner = BigText::builder()
            .pixel_size(PixelSize::Quadrant)
            .style(Style::default().fg(color))
            .lines(vec![game.prediction.clone().into()])
            .alignment(Alignment::Center)
            .build();
        f.render_widget(winner, rows[1]);
    }

    let confidence = Paragraph::new(format!("{} confidence", format_confidence(game.confidence)))
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);
    f.render_widget(confidence, rows[2]);
}

fn draw_unknown_prediction(f: &mut Frame, err: &DerivationError, area: Rect) {
    let lines = vec![
        Line::from("Unrecognized prediction").fg(Color::Yellow).add_modifier(Modifier::BOLD),
        Line::from(err.to_string()),
    ];
    let p = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Yellow)));
    f.render_widget(p, area);
}

/// Horizontal bar filled from the predicted side's edge in proportion to the
/// model confidence. Away sits on the left, home on the right.
struct ConfidenceMeter {
    side: PredictedSide,
    confidence: f64,
}

impl Widget for ConfidenceMeter {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 10 || area.height == 0 {
            return;
        }

        let ratio = (self.confidence / 100.0).clamp(0.0, 1.0);
        let filled = (ratio * area.width as f64).round() as u16;
        let color = role_color(self.side.role());

        for x in area.left()..area.right() {
            let offset = x - area.left();
            let lit = match self.side {
                PredictedSide::Away => offset < filled,
                PredictedSide::Home => offset >= area.width - filled,
            };
            let bg = if lit { color } else { Color::DarkGray };
            for y in area.top()..area.bottom() {
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_bg(bg).set_char(' ');
                }
            }
        }

        let label = format_confidence(self.confidence);
        let mid_y = area.top() + area.height / 2;
        let col = area.left() + area.width.saturating_sub(label.len() as u16) / 2;
        buf.set_string(col, mid_y, &label, Style::default().fg(Color::White).add_modifier(Modifier::BOLD));
    }
}
