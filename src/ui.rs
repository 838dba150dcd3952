use rand::Rng;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::{
    app::{App, Feedback},
    scheduler::Clock,
    session::Phase,
};

const HORIZONTAL_MARGIN: u16 = 5;

const INK: Color = Color::Rgb(223, 208, 184);
const PANEL: Color = Color::Rgb(60, 91, 111);
const SAND: Color = Color::Rgb(148, 137, 121);
const SLATE: Color = Color::Rgb(21, 52, 72);

impl<C: Clock, R: Rng> Widget for &App<C, R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(1), // instruction
                Constraint::Length(3), // word display
                Constraint::Length(3), // entry
                Constraint::Length(7), // results
                Constraint::Length(1), // countdown
                Constraint::Length(1), // padding
                Constraint::Length(1), // legend
                Constraint::Min(0),
            ])
            .split(area);

        Paragraph::new(Span::styled(
            "Type the word below:",
            Style::default().fg(INK),
        ))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

        let mut words = self.session.queue();
        let mut spans = Vec::new();
        if let Some(current) = words.next() {
            spans.push(Span::styled(
                current.to_string(),
                Style::default().patch(bold_style).fg(SLATE),
            ));
        }
        for preview in words {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                preview.to_string(),
                Style::default().patch(dim_style).fg(SLATE),
            ));
        }
        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .style(Style::default().bg(SAND)),
            )
            .render(chunks[2], buf);

        let entry_inner = chunks[3].width.saturating_sub(3) as usize;
        let entry_line = if self.input_enabled() {
            Line::from(vec![
                Span::styled(visible_tail(&self.entry, entry_inner).to_string(), bold_style),
                Span::styled(" ", Style::default().add_modifier(Modifier::UNDERLINED)),
            ])
        } else {
            Line::from(Span::styled(
                visible_tail(&self.entry, entry_inner).to_string(),
                dim_style,
            ))
        };
        Paragraph::new(entry_line)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(if self.input_enabled() { bold_style } else { dim_style })
                    .style(Style::default().fg(SLATE).bg(INK)),
            )
            .render(chunks[3], buf);

        Paragraph::new(results_lines(self.feedback.as_ref(), self.phase()))
            .alignment(Alignment::Center)
            .style(Style::default().fg(INK).bg(PANEL))
            .render(chunks[4], buf);

        Paragraph::new(Span::styled(
            format!("Time left: {}", self.session.state.seconds_remaining),
            Style::default().patch(bold_style).fg(INK),
        ))
        .alignment(Alignment::Center)
        .render(chunks[5], buf);

        Paragraph::new(Span::styled(legend(self.phase()), italic_style))
            .alignment(Alignment::Center)
            .render(chunks[7], buf);
    }
}

pub fn results_lines(feedback: Option<&Feedback>, phase: Phase) -> Vec<Line<'static>> {
    let mut lines = match feedback {
        Some(Feedback::Correct { metrics, best }) => vec![
            Line::from(format!("Gross WPM: {}", metrics.gross_wpm)),
            Line::from(format!("Best Gross WPM: {}", best.gross_wpm)),
            Line::from(format!("Net WPM: {:.1}", metrics.net_wpm)),
            Line::from(format!("Best Net WPM: {:.1}", best.net_wpm)),
            Line::from(format!("CPM: {}", metrics.cpm)),
            Line::from(format!("Best CPM: {}", best.cpm)),
        ],
        Some(Feedback::Incorrect) => vec![Line::from("Incorrect. Try again.")],
        None => Vec::new(),
    };
    if phase == Phase::Expired {
        lines.push(Line::from(Span::styled(
            "Time's up!",
            Style::default().add_modifier(Modifier::BOLD),
        )));
    }
    lines
}

pub fn legend(phase: Phase) -> &'static str {
    match phase {
        Phase::Idle => "(enter) start / (esc)ape",
        Phase::Running => "(space) submit / (ctrl+r) reset / (esc)ape",
        Phase::Expired => "(enter) start again / (ctrl+r) reset / (esc)ape",
    }
}

/// Longest suffix of `s` that fits in `width` terminal columns.
pub fn visible_tail(s: &str, width: usize) -> &str {
    if s.width() <= width {
        return s;
    }
    let mut used = 0;
    for (idx, c) in s.char_indices().rev() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            return &s[idx + c.len_utf8()..];
        }
        used += w;
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{ManualClock, TimerQueue};
    use crate::session::{Session, SessionConfig};
    use crate::stats::{BestScores, Metrics};
    use crate::words::WordList;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn create_test_app(words: &[&str], secs: u32) -> App<ManualClock, StdRng> {
        let list: WordList = words.iter().copied().collect();
        let config = SessionConfig {
            number_of_secs: secs,
            queue_len: 2,
        };
        App::with_parts(
            Session::new(list, config, StdRng::seed_from_u64(9)),
            TimerQueue::with_clock(ManualClock::new()),
        )
    }

    fn render(app: &App<ManualClock, StdRng>) -> String {
        let area = Rect::new(0, 0, 80, 24);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        buffer
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn idle_screen_shows_word_timer_and_legend() {
        let app = create_test_app(&["keyboard"], 60);
        let rendered = render(&app);

        assert!(rendered.contains("Type the word below:"));
        assert!(rendered.contains("keyboard"));
        assert!(rendered.contains("Time left: 60"));
        assert!(rendered.contains("(enter) start"));
    }

    #[test]
    fn running_screen_shows_entry_and_results() {
        let mut app = create_test_app(&["keyboard"], 30);
        app.start();
        app.entry = "keyxz".to_string();
        app.feedback = Some(Feedback::Correct {
            metrics: Metrics {
                gross_wpm: 42,
                net_wpm: 40.5,
                cpm: 210,
            },
            best: BestScores {
                gross_wpm: 55,
                net_wpm: 50.0,
                cpm: 275,
            },
        });
        let rendered = render(&app);

        assert!(rendered.contains("keyxz"));
        assert!(rendered.contains("Gross WPM: 42"));
        assert!(rendered.contains("Best Gross WPM: 55"));
        assert!(rendered.contains("Net WPM: 40.5"));
        assert!(rendered.contains("Best CPM: 275"));
        assert!(rendered.contains("(space) submit"));
    }

    #[test]
    fn incorrect_feedback_text() {
        let lines = results_lines(Some(&Feedback::Incorrect), Phase::Running);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].to_string(), "Incorrect. Try again.");
    }

    #[test]
    fn expired_adds_times_up() {
        let lines = results_lines(None, Phase::Expired);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].to_string(), "Time's up!");
        assert!(results_lines(None, Phase::Idle).is_empty());
    }

    #[test]
    fn renders_in_tiny_area_without_panicking() {
        let app = create_test_app(&["a"], 60);
        let area = Rect::new(0, 0, 12, 4);
        let mut buffer = Buffer::empty(area);
        (&app).render(area, &mut buffer);
    }

    #[test]
    fn visible_tail_keeps_end_of_text() {
        assert_eq!(visible_tail("hello", 10), "hello");
        assert_eq!(visible_tail("hello world", 5), "world");
        assert_eq!(visible_tail("", 0), "");
        // wide chars take two columns
        assert_eq!(visible_tail("ab日本", 4), "日本");
        assert_eq!(visible_tail("ab日本", 3), "本");
    }
}
