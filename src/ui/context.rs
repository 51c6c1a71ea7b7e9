use termion::{color, style};

use crate::config::ThemeConfig;
use crate::navigation::CellStyle;

#[derive(Clone, Debug)]
pub struct Theme {
    pub day_style: String,
    pub weekend_day_style: String,
    pub other_month_day_style: String,
    pub today_day_style: String,
    pub today_day_char: Option<char>,
    pub focus_day_style: String,
    pub focus_day_char: Option<char>,
    pub month_header_style: String,
    pub week_label_style: String,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            day_style: String::new(),
            weekend_day_style: color::Fg(color::Red).to_string(),
            other_month_day_style: style::Faint.to_string(),
            today_day_style: format!("{}{}", color::Fg(color::Yellow), style::Bold),
            today_day_char: Some('*'),
            focus_day_style: style::Invert.to_string(),
            focus_day_char: Some('>'),
            month_header_style: format!("{}{}", color::Fg(color::Yellow), style::Bold),
            week_label_style: style::Bold.to_string(),
        }
    }
}

impl Theme {
    pub fn from_config(config: &ThemeConfig) -> Self {
        Theme {
            today_day_char: config.today_char,
            focus_day_char: config.selected_char,
            ..Theme::default()
        }
    }

    pub fn cell_style(&self, style: CellStyle) -> &str {
        match style {
            CellStyle::Today => &self.today_day_style,
            CellStyle::OtherMonth => &self.other_month_day_style,
            CellStyle::Weekend => &self.weekend_day_style,
            CellStyle::Normal => &self.day_style,
        }
    }
}
