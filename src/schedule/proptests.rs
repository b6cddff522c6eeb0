//! Property-based tests for the schedule calculator.

use super::*;
use proptest::prelude::*;

fn arb_variant() -> impl Strategy<Value = LessonVariant> {
    (
        "[а-я]{3,12}",
        prop_oneof![Just("лк".to_string()), Just("пр".to_string())],
        proptest::collection::vec(1u32..18, 1..6),
    )
        .prop_map(|(name, types, weeks)| LessonVariant { name, types, weeks })
}

fn arb_day() -> impl Strategy<Value = DaySchedule> {
    proptest::collection::vec(proptest::collection::vec(arb_variant(), 0..4), 0..8)
        .prop_map(|lessons| DaySchedule { lessons })
}

fn arb_doc() -> impl Strategy<Value = ScheduleDoc> {
    proptest::collection::hash_map("[1-7]", arb_day(), 1..7)
        .prop_map(|schedule| ScheduleDoc { schedule })
}

proptest! {
    #[test]
    fn lesson_word_follows_declension_rule(count in 0usize..100) {
        let word = lesson_word(count);
        match count {
            1 => prop_assert_eq!(word, "пара"),
            2..=4 => prop_assert_eq!(word, "пары"),
            _ => prop_assert_eq!(word, "пар"),
        }
    }

    #[test]
    fn count_equals_list_length(
        doc in arb_doc(),
        digit in "[1-7]",
        even in any::<bool>(),
    ) {
        let parity = if even { WeekParity::Even } else { WeekParity::Odd };
        let count = lesson_count(&doc, &digit, parity);
        let listed = doc
            .schedule
            .get(&digit)
            .map_or(0, |day| select_lessons(day, parity).len());
        prop_assert_eq!(count, listed);

        // The rendered list carries exactly one numbered line per
        // selected lesson.
        let date = NaiveDate::from_ymd_opt(2024, 9, 9).unwrap();
        let rendered = render_list(&doc, "ИКБО-01-20", &digit, date, parity);
        let lines = rendered.lines().filter(|l| l.contains("-ая пара.")).count();
        if count == 0 {
            prop_assert_eq!(rendered, "Пар нет! Отдыхайте!");
        } else {
            prop_assert_eq!(lines, count);
        }
    }

    #[test]
    fn nearest_date_lands_on_requested_weekday(
        digit in "[1-7]",
        offset in 0i64..3650,
    ) {
        let today = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + Duration::days(offset);
        let date = nearest_date(&digit, today);
        prop_assert!(date > today);
        prop_assert!((date - today).num_days() <= 7);
        prop_assert_eq!(digit_for_date(date), digit.as_str());
    }

    #[test]
    fn parity_alternates_weekly(offset in 0i64..520) {
        let start = NaiveDate::from_ymd_opt(2024, 9, 2).unwrap();
        let date = start + Duration::days(offset * 7);
        let next = date + Duration::days(7);
        prop_assert_ne!(week_parity(date, start), week_parity(next, start));
    }
}
