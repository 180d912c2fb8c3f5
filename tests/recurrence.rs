#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use worksuite::libs::recurrence::{add_months, anchor_date, rolls_forward, successor, Cadence, MonthOverflow, Recurrence};
    use worksuite::libs::task::{Priority, Status, Task};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_daily_and_weekly_steps() {
        let daily = Recurrence::new(Cadence::Daily, 3).unwrap();
        assert_eq!(daily.advance(date(2024, 2, 27), MonthOverflow::Clamp).unwrap(), date(2024, 3, 1));

        let biweekly = Recurrence::new(Cadence::Weekly, 2).unwrap();
        assert_eq!(biweekly.advance(date(2024, 1, 1), MonthOverflow::Clamp).unwrap(), date(2024, 1, 15));
    }

    #[test]
    fn test_monthly_clamps_to_month_end() {
        let monthly = Recurrence::new(Cadence::Monthly, 1).unwrap();
        assert_eq!(monthly.advance(date(2024, 1, 31), MonthOverflow::Clamp).unwrap(), date(2024, 2, 29));
        assert_eq!(monthly.advance(date(2023, 1, 31), MonthOverflow::Clamp).unwrap(), date(2023, 2, 28));
        assert_eq!(monthly.advance(date(2024, 3, 15), MonthOverflow::Clamp).unwrap(), date(2024, 4, 15));
    }

    #[test]
    fn test_monthly_rollover_carries_surplus_days() {
        assert_eq!(add_months(date(2024, 1, 31), 1, MonthOverflow::Rollover), Some(date(2024, 3, 2)));
        assert_eq!(add_months(date(2023, 1, 31), 1, MonthOverflow::Rollover), Some(date(2023, 3, 3)));
        // No overflow means both policies agree.
        assert_eq!(add_months(date(2024, 5, 10), 2, MonthOverflow::Rollover), Some(date(2024, 7, 10)));
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        assert!(Recurrence::new(Cadence::Daily, 0).is_err());

        let broken = Recurrence {
            cadence: Cadence::Weekly,
            interval: 0,
        };
        assert!(broken.advance(date(2024, 1, 1), MonthOverflow::Clamp).is_err());
    }

    #[test]
    fn test_anchor_prefers_due_then_start_then_today() {
        let today = date(2024, 6, 1);
        let mut task = Task::new("Anchor");
        assert_eq!(anchor_date(&task, today), today);

        task.start_date = Some(date(2024, 5, 20));
        assert_eq!(anchor_date(&task, today), date(2024, 5, 20));

        task.due_date = Some(date(2024, 5, 25));
        assert_eq!(anchor_date(&task, today), date(2024, 5, 25));
    }

    #[test]
    fn test_rolls_forward_only_on_transition_to_done() {
        let mut task = Task::new("Standup notes");
        task.recurrence = Some(Recurrence::new(Cadence::Daily, 1).unwrap());
        task.status = Status::Done;

        assert!(rolls_forward(Status::InProgress, &task));
        assert!(!rolls_forward(Status::Done, &task));

        task.status = Status::Cancelled;
        assert!(!rolls_forward(Status::InProgress, &task));

        let mut one_off = Task::new("One off");
        one_off.status = Status::Done;
        assert!(!rolls_forward(Status::New, &one_off));
    }

    #[test]
    fn test_successor_copies_fields_and_resets_status() {
        let mut task = Task::new("Pay invoices");
        task.id = Some(7);
        task.parent_id = Some(3);
        task.user_id = "alice".to_string();
        task.description = Some("Supplier batch".to_string());
        task.owner = Some("finance".to_string());
        task.priority = Priority::High;
        task.status = Status::Done;
        task.due_date = Some(date(2024, 1, 31));
        task.recurrence = Some(Recurrence::new(Cadence::Monthly, 1).unwrap());

        let next = successor(&task, date(2024, 2, 5), MonthOverflow::Clamp).unwrap().unwrap();
        assert_eq!(next.id, None);
        assert_eq!(next.parent_id, None);
        assert_eq!(next.title, "Pay invoices");
        assert_eq!(next.user_id, "alice");
        assert_eq!(next.description.as_deref(), Some("Supplier batch"));
        assert_eq!(next.owner.as_deref(), Some("finance"));
        assert_eq!(next.priority, Priority::High);
        assert_eq!(next.status, Status::New);
        assert_eq!(next.start_date, Some(date(2024, 2, 29)));
        assert_eq!(next.due_date, Some(date(2024, 2, 29)));
        assert_eq!(next.recurrence, task.recurrence);
    }

    #[test]
    fn test_successor_of_one_off_task_is_none() {
        let task = Task::new("Once");
        assert!(successor(&task, date(2024, 1, 1), MonthOverflow::Clamp).unwrap().is_none());
    }

    #[test]
    fn test_revise_interval_keeps_cadence() {
        let weekly = Recurrence::new(Cadence::Weekly, 1).unwrap();

        let every_three = Recurrence::revise(Some(weekly), None, Some(3)).unwrap().unwrap();
        assert_eq!(every_three.cadence, Cadence::Weekly);
        assert_eq!(every_three.interval, 3);

        let monthly = Recurrence::revise(Some(every_three), Some(Cadence::Monthly), None).unwrap().unwrap();
        assert_eq!(monthly.interval, 1);

        assert_eq!(Recurrence::revise(Some(weekly), None, None).unwrap(), Some(weekly));
        assert_eq!(Recurrence::revise(None, None, None).unwrap(), None);
        assert!(Recurrence::revise(None, None, Some(2)).is_err());
        assert!(Recurrence::revise(Some(weekly), None, Some(0)).is_err());
    }
}
