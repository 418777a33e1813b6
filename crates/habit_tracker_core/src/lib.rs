pub mod domain;
pub mod ports;

pub use domain::{
    AuthGrant, CalendarDay, CalendarMonth, Checkin, CheckinRange, Frequency, Habit, HabitFilter,
    HabitTrends, HabitUpdate, LoginRequest, NewCheckin, NewHabit, RegisterRequest, Session,
    Streaks, TrendRange, User,
};
pub use ports::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, PortError, PortResult, SessionStorage,
};
