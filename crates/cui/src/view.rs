use crate::app::{image_label, problem_label, slot_label, App, Screen};
use cropmatch_core::{AlbumDetail, Phase};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Alignment, Color, Line, Modifier, Style, Stylize};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

pub fn draw(frame: &mut Frame, app: &App) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Min(10),
            Constraint::Length(8),
        ])
        .split(frame.area());

    draw_header(frame, root[0], app);
    match app.screen {
        Screen::Round => draw_round(frame, root[1], app),
        Screen::Album => draw_album(frame, root[1], app),
    }
    draw_events(frame, root[2], app);

    if app.screen == Screen::Round {
        if let Some(message) = app.view.error.as_ref() {
            draw_popup(frame, "Error", Color::Red, vec![
                Line::from(message.clone()),
                Line::from(""),
                Line::from("q quit"),
            ]);
        } else if app.view.paused {
            draw_popup(frame, "Paused", Color::Cyan, vec![
                Line::from("r resume"),
                Line::from("q quit"),
            ]);
        } else if let Some(summary) = app.view.session_summary.as_ref() {
            let mut lines = vec![
                Line::from(format!("Final score: {}", summary.final_score).bold()),
                Line::from(format!("High score: {}", summary.high_score)),
            ];
            if summary.beaten {
                lines.push(Line::from("New high score!".fg(Color::Yellow)));
            }
            lines.push(Line::from(""));
            lines.push(Line::from("c continue | q quit"));
            draw_popup(frame, "Session Over", Color::Green, lines);
        }
    }
    if app.show_help {
        draw_help_popup(frame);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let state = app.engine.state();
    let config = app.engine.config();
    let title = format!("Crop Match | Hint: {}", app.next_hint());
    let summary = format!(
        "{}  Round {}/{}  Score {}  Combo {}  Best {}",
        app.phase().label(),
        (state.rounds_played_in_session + 1).min(config.session_rounds),
        config.session_rounds,
        state.current_score,
        state.combo_count,
        app.engine.session().high_score()
    );
    let timer = app.view.timer_text.as_deref().unwrap_or("Time left: -");
    let extra = format!(
        "{timer} | Unlocked {}/{} | Seed {}",
        app.engine.session().record().unlocked_variant_ids.len(),
        app.engine.catalog().len(),
        app.seed
    );
    let mut lines = vec![
        Line::from(title.bold()),
        Line::from(summary),
        Line::from(extra),
        Line::from(format!("Status: {}", app.status_line)),
    ];
    if let Some(round) = app.view.round_summary.as_ref() {
        lines.push(Line::from(round.clone()));
    }
    let block = Block::default().borders(Borders::ALL).title("Overview");
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true }).block(block);
    frame.render_widget(paragraph, area);
}

fn draw_round(frame: &mut Frame, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(5)])
        .split(columns[0]);

    if let Some(debug) = app.view.debug_card.as_ref() {
        let lines = vec![
            Line::from(format!("Card {}/{}", debug.index + 1, debug.total).bold()),
            Line::from(format!("Answer: {}", debug.problem.source.variant_id)),
            Line::from(format!("Problem: {}", problem_label(&debug.problem))),
            Line::from(""),
            Line::from("left/right browse | F12 exit"),
        ];
        let block = pane_block("Debug", true);
        frame.render_widget(Paragraph::new(lines).block(block), columns[0]);
        draw_hand(frame, columns[1], app);
        return;
    }

    let problem = match app.view.problem.as_ref() {
        Some(problem) => vec![
            Line::from("Which card is this crop from?"),
            Line::from(""),
            Line::from(problem_label(problem).bold()),
        ],
        None => vec![Line::from("no problem card")],
    };
    frame.render_widget(
        Paragraph::new(problem)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(pane_block("Problem", app.phase() == Phase::AwaitingInput)),
        left[0],
    );

    let judgment = match app.view.judgment.as_ref() {
        Some(judgment) => {
            let color = if judgment.correct {
                Color::Green
            } else {
                Color::Red
            };
            vec![
                Line::from(judgment.headline().fg(color).bold()),
                Line::from(format!("+{} | combo {}", judgment.awarded, judgment.combo)),
            ]
        }
        None => vec![Line::from("")],
    };
    frame.render_widget(
        Paragraph::new(judgment)
            .alignment(Alignment::Center)
            .block(pane_block("Judgment", false)),
        left[1],
    );
    draw_hand(frame, columns[1], app);
}

fn draw_hand(frame: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem<'_>> = if app.view.slots.is_empty() {
        vec![ListItem::new("empty")]
    } else {
        app.view
            .slots
            .iter()
            .enumerate()
            .map(|(idx, card)| ListItem::new(slot_label(idx, card)))
            .collect()
    };
    let mut state = ListState::default();
    if let (Some(_), Some(hand)) = (app.view.judgment.as_ref(), app.engine.hand()) {
        if hand.correct_index() < app.view.slots.len() {
            state.select(Some(hand.correct_index()));
        }
    }
    let list = List::new(items)
        .block(pane_block("Hand", false))
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_album(frame: &mut Frame, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let entries = app.album.album.entries();
    let items: Vec<ListItem<'_>> = if entries.is_empty() {
        vec![ListItem::new("no cards")]
    } else {
        entries
            .iter()
            .map(|entry| {
                let label = if entry.unlocked {
                    image_label(&entry.image)
                } else {
                    "???".to_string()
                };
                ListItem::new(label)
            })
            .collect()
    };
    let title = format!(
        "Album {}/{}",
        app.album.album.unlocked_count(),
        entries.len()
    );
    let list = List::new(items)
        .block(pane_block(title.as_str(), true))
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");
    let mut state = ListState::default();
    if !entries.is_empty() {
        state.select(Some(app.album.cursor.min(entries.len() - 1)));
    }
    frame.render_stateful_widget(list, columns[0], &mut state);

    let lines = match app.album.detail.as_ref() {
        None => vec![Line::from("enter show details | esc back")],
        Some(AlbumDetail::Locked(message)) => vec![Line::from(*message)],
        Some(AlbumDetail::Missing) => vec![Line::from("no description available")],
        Some(AlbumDetail::Unlocked {
            image,
            description,
            video,
        }) => {
            let mut lines = vec![
                Line::from(image_label(image).bold()),
                Line::from(""),
                Line::from(description.clone()),
                Line::from(""),
            ];
            match video {
                Some(video) => lines.push(Line::from(format!("v video: {}", video.title))),
                None => lines.push(Line::from("no video")),
            }
            lines
        }
    };
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(pane_block("Details", false)),
        columns[1],
    );

    if let Some(video) = app.album.video_prompt.as_ref() {
        draw_popup(frame, "Video", Color::Green, vec![
            Line::from(video.confirm_prompt()),
            Line::from(""),
            Line::from("y open | n cancel"),
        ]);
    }
}

fn draw_events(frame: &mut Frame, area: Rect, app: &App) {
    let capacity = area.height.saturating_sub(2) as usize;
    let start = app.event_log.len().saturating_sub(capacity);
    let lines: Vec<Line<'_>> = app
        .event_log
        .iter()
        .skip(start)
        .map(|line| Line::from(line.clone()))
        .collect();
    frame.render_widget(Paragraph::new(lines).block(pane_block("Events", false)), area);
}

fn draw_popup(frame: &mut Frame, title: &str, color: Color, lines: Vec<Line<'_>>) {
    let area = centered_rect(50, 30, frame.area());
    frame.render_widget(Clear, area);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn draw_help_popup(frame: &mut Frame) {
    let area = centered_rect(70, 60, frame.area());
    frame.render_widget(Clear, area);
    let lines = vec![
        Line::from("1-9 pick a card | p pause | r resume"),
        Line::from("c / enter continue after a session"),
        Line::from("q quit (while paused or after a session) | Ctrl+C force quit"),
        Line::from("a album | up/down move | enter details | v video | esc back"),
        Line::from("F12 or ` debug browse | left/right step"),
        Line::from("? help"),
    ];
    let block = Block::default()
        .title("Help")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn pane_block(title: &str, focused: bool) -> Block<'_> {
    let mut block = Block::default().title(title).borders(Borders::ALL);
    if focused {
        block = block.border_style(Style::default().fg(Color::Yellow));
    }
    block
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
