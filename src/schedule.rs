//! Schedule calculator
//!
//! Pure weekday / week-parity / lesson-count arithmetic over the
//! schedule document served by the university timetable API. No I/O
//! happens here; callers fetch the document and pass it in together
//! with a reference date, which keeps every function testable against
//! fixed calendars.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Deserialize;
use std::collections::HashMap;

#[cfg(test)]
mod proptests;

/// Full schedule for one group, keyed by weekday digit `"1"`..`"7"`.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleDoc {
    pub schedule: HashMap<String, DaySchedule>,
}

/// One weekday: an ordered sequence of lesson slots. A slot holds 0,
/// 1 or 2+ variants; variants exist because the same slot differs
/// between even and odd academic weeks.
#[derive(Debug, Clone, Deserialize)]
pub struct DaySchedule {
    pub lessons: Vec<Vec<LessonVariant>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LessonVariant {
    pub name: String,
    /// Short type code, `"лк"` or `"пр"`.
    pub types: String,
    /// Academic week numbers this variant runs on.
    pub weeks: Vec<u32>,
}

/// Even/odd academic-week classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekParity {
    Even,
    Odd,
}

/// How the requested day should be phrased back to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayLabel {
    Today,
    Tomorrow,
    /// Explicit weekday, phrased with its Russian name.
    Named,
}

/// A request day resolved to everything the phrasing code needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDay {
    /// Wire-format weekday digit, `"1"`..`"7"`.
    pub digit: &'static str,
    pub label: DayLabel,
    /// Calendar date the schedule applies to.
    pub date: NaiveDate,
}

impl ResolvedDay {
    pub fn is_sunday(&self) -> bool {
        self.digit == "7"
    }
}

/// Weekday slot value sent by the NLU ("Monday") mapped to the wire
/// digit. Returns `None` for anything that is not a weekday name.
pub fn weekday_digit(name: &str) -> Option<&'static str> {
    Some(match name {
        "Monday" => "1",
        "Tuesday" => "2",
        "Wednesday" => "3",
        "Thursday" => "4",
        "Friday" => "5",
        "Saturday" => "6",
        "Sunday" => "7",
        _ => return None,
    })
}

/// Russian rendering of a weekday digit, in the case the count phrase
/// needs (accusative for Wednesday/Friday/Saturday).
pub fn day_name(digit: &str) -> Option<&'static str> {
    Some(match digit {
        "1" => "Понедельник",
        "2" => "Вторник",
        "3" => "Среду",
        "4" => "Четверг",
        "5" => "Пятницу",
        "6" => "Субботу",
        "7" => "Воскресенье",
        _ => return None,
    })
}

fn digit_for_date(date: NaiveDate) -> &'static str {
    match date.weekday().num_days_from_monday() {
        0 => "1",
        1 => "2",
        2 => "3",
        3 => "4",
        4 => "5",
        5 => "6",
        _ => "7",
    }
}

/// Nearest strictly-future calendar date falling on the given weekday
/// digit. Asking for today's weekday by name means next week.
pub fn nearest_date(digit: &str, today: NaiveDate) -> NaiveDate {
    let target = digit.parse::<i64>().unwrap_or(1) - 1;
    let mut ahead = target - i64::from(today.weekday().num_days_from_monday());
    if ahead <= 0 {
        ahead += 7;
    }
    today + Duration::days(ahead)
}

/// Resolve the requested day from the `when` slot and/or a relative
/// date entity. The slot value `"YandexDatetime"` means the day is
/// carried in the entities instead of being a weekday name.
pub fn resolve_day(
    when_slot: Option<&str>,
    relative: Option<u8>,
    today: NaiveDate,
) -> Option<ResolvedDay> {
    match when_slot {
        Some("YandexDatetime") | None => {
            let offset = relative?;
            let date = today + Duration::days(i64::from(offset.min(1)));
            Some(ResolvedDay {
                digit: digit_for_date(date),
                label: if offset == 0 {
                    DayLabel::Today
                } else {
                    DayLabel::Tomorrow
                },
                date,
            })
        }
        Some(name) => {
            let digit = weekday_digit(name)?;
            Some(ResolvedDay {
                digit,
                label: DayLabel::Named,
                date: nearest_date(digit, today),
            })
        }
    }
}

/// Parity of the academic week a date falls in. The semester epoch is
/// configuration; the first week of the semester is week 1, odd.
pub fn week_parity(date: NaiveDate, semester_start: NaiveDate) -> WeekParity {
    let epoch_monday =
        semester_start - Duration::days(i64::from(semester_start.weekday().num_days_from_monday()));
    let days = (date - epoch_monday).num_days();
    if days < 0 {
        return WeekParity::Odd;
    }
    if (days / 7 + 1) % 2 == 0 {
        WeekParity::Even
    } else {
        WeekParity::Odd
    }
}

/// A `weeks` list is odd if it contains any odd week number.
fn variant_parity(weeks: &[u32]) -> WeekParity {
    if weeks.iter().any(|w| w % 2 == 1) {
        WeekParity::Odd
    } else {
        WeekParity::Even
    }
}

/// Select the variant shown in each slot for the given parity.
///
/// A single-variant slot only runs on the weeks of its declared
/// parity; a slot with two or more variants has content on both
/// parities, only the shown variant differs (even weeks show the
/// second variant, odd weeks the first).
fn select_lessons<'a>(
    day: &'a DaySchedule,
    parity: WeekParity,
) -> Vec<(usize, &'a LessonVariant)> {
    let mut picked = Vec::new();
    for (slot_idx, slot) in day.lessons.iter().enumerate() {
        match slot.len() {
            0 => {}
            1 => {
                if variant_parity(&slot[0].weeks) == parity {
                    picked.push((slot_idx, &slot[0]));
                }
            }
            _ => {
                let variant = match parity {
                    WeekParity::Even => &slot[1],
                    WeekParity::Odd => &slot[0],
                };
                picked.push((slot_idx, variant));
            }
        }
    }
    picked
}

/// Number of lessons on the given weekday for the given parity.
pub fn lesson_count(doc: &ScheduleDoc, digit: &str, parity: WeekParity) -> usize {
    doc.schedule
        .get(digit)
        .map_or(0, |day| select_lessons(day, parity).len())
}

fn type_label(code: &str) -> &str {
    match code {
        "лк" => "Лекция",
        "пр" => "Практика",
        other => other,
    }
}

/// Rendered lesson list for one day, or the fixed rest sentence when
/// nothing qualifies.
pub fn render_list(
    doc: &ScheduleDoc,
    group: &str,
    digit: &str,
    date: NaiveDate,
    parity: WeekParity,
) -> String {
    let picked = doc
        .schedule
        .get(digit)
        .map(|day| select_lessons(day, parity))
        .unwrap_or_default();

    if picked.is_empty() {
        return "Пар нет! Отдыхайте!".to_string();
    }

    let mut text = format!(
        "Расписание для группы {group} на {}\n\n",
        date.format("%d.%m.%Y")
    );
    for (slot_idx, lesson) in picked {
        text.push_str(&format!(
            "{}-ая пара. {}. {}.\n",
            slot_idx + 1,
            lesson.name,
            type_label(&lesson.types)
        ));
    }
    text
}

/// «пара» declined for a count: 1 пара, 2–4 пары, 0 or 5+ пар.
pub fn lesson_word(count: usize) -> &'static str {
    match count {
        1 => "пара",
        2..=4 => "пары",
        _ => "пар",
    }
}

/// Sunday never has lessons; phrased without consulting the document.
pub fn sunday_text(label: DayLabel) -> &'static str {
    match label {
        DayLabel::Today => "Сегодня воскресенье, пар нет, можно отдыхать!",
        DayLabel::Tomorrow => "Завтра воскресенье, пар нет, можно отдыхать",
        DayLabel::Named => "В воскресенье пар нет, можно отдыхать!",
    }
}

/// Phrase the lesson count for a resolved day.
pub fn count_text(resolved: &ResolvedDay, count: usize) -> String {
    match resolved.label {
        DayLabel::Today => {
            if count == 0 {
                "Сегодня у вас нет пар! Отдыхайте!".to_string()
            } else {
                format!("Сегодня у вас {count} {}", lesson_word(count))
            }
        }
        DayLabel::Tomorrow => {
            if count == 0 {
                "Завтра у вас нет пар! Отдыхайте!".to_string()
            } else {
                format!("Завтра у вас {count} {}", lesson_word(count))
            }
        }
        DayLabel::Named => {
            let name = day_name(resolved.digit).unwrap_or("этот день");
            // «Во вторник», «в среду» — Tuesday takes the longer preposition.
            let preposition = if resolved.digit == "2" { "Во" } else { "В" };
            let name = name.to_lowercase();
            if count == 0 {
                format!("{preposition} {name} пар нет! Отдыхайте")
            } else {
                format!("{preposition} {name} у вас {count} {}", lesson_word(count))
            }
        }
    }
}

#[cfg(test)]
pub(crate) fn doc_from_json(raw: serde_json::Value) -> ScheduleDoc {
    serde_json::from_value(raw).expect("schedule fixture")
}
