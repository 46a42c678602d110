//! Which page and home tab are on screen, and which data load each one owns.
//!
//! Every load is issued as a [`Ticket`] carrying a per-view generation. A
//! response is only rendered while its ticket is still the newest one for the
//! view and the view is still on screen, so a slow response can never paint
//! over a newer page.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Page {
    #[default]
    Home,
    Planner,
    Training,
    Classes,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Home, Page::Planner, Page::Training, Page::Classes];

    pub fn slug(self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::Planner => "planner",
            Page::Training => "training",
            Page::Classes => "classes",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|page| page.slug() == slug)
    }

    pub fn title(self) -> &'static str {
        match self {
            Page::Home => "Início",
            Page::Planner => "Planejador",
            Page::Training => "Treinos",
            Page::Classes => "Aulas",
        }
    }

    pub fn load_action(self) -> Option<LoadAction> {
        match self {
            Page::Home => Some(LoadAction::Dashboard),
            Page::Planner => Some(LoadAction::PlannerInit),
            Page::Training => Some(LoadAction::Programs),
            Page::Classes => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HomeTab {
    #[default]
    Overview,
    DayToDay,
}

impl HomeTab {
    pub const ALL: [HomeTab; 2] = [HomeTab::Overview, HomeTab::DayToDay];

    pub fn slug(self) -> &'static str {
        match self {
            HomeTab::Overview => "overview",
            HomeTab::DayToDay => "day-to-day",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tab| tab.slug() == slug)
    }

    pub fn title(self) -> &'static str {
        match self {
            HomeTab::Overview => "Visão geral",
            HomeTab::DayToDay => "Dia a dia",
        }
    }

    pub fn load_action(self) -> Option<LoadAction> {
        match self {
            HomeTab::Overview => None,
            HomeTab::DayToDay => Some(LoadAction::DayToDay),
        }
    }
}

/// A data load, which also names the logical view it paints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadAction {
    Dashboard,
    PlannerInit,
    Programs,
    DayToDay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub action: LoadAction,
    pub generation: u64,
}

#[derive(Debug, Default)]
pub struct Navigator {
    current_page: Page,
    current_home_tab: HomeTab,
    generations: HashMap<LoadAction, u64>,
}

impl Navigator {
    pub fn current_page(&self) -> Page {
        self.current_page
    }

    pub fn current_home_tab(&self) -> HomeTab {
        self.current_home_tab
    }

    pub fn activate_page(&mut self, page: Page) -> Option<Ticket> {
        self.current_page = page;
        page.load_action().map(|action| self.issue(action))
    }

    pub fn activate_home_tab(&mut self, tab: HomeTab) -> Option<Ticket> {
        self.current_home_tab = tab;
        tab.load_action().map(|action| self.issue(action))
    }

    pub fn issue(&mut self, action: LoadAction) -> Ticket {
        let generation = self.generations.entry(action).or_insert(0);
        *generation += 1;
        Ticket {
            action,
            generation: *generation,
        }
    }

    pub fn is_on_screen(&self, action: LoadAction) -> bool {
        match action {
            LoadAction::Dashboard => self.current_page == Page::Home,
            LoadAction::DayToDay => {
                self.current_page == Page::Home && self.current_home_tab == HomeTab::DayToDay
            }
            LoadAction::PlannerInit => self.current_page == Page::Planner,
            LoadAction::Programs => self.current_page == Page::Training,
        }
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.generations.get(&ticket.action) == Some(&ticket.generation)
            && self.is_on_screen(ticket.action)
    }

    /// Back to the initial state. Every generation advances, so tickets
    /// issued before the reset are stale even for views back on screen.
    pub fn reset(&mut self) {
        self.current_page = Page::default();
        self.current_home_tab = HomeTab::default();
        for generation in self.generations.values_mut() {
            *generation += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_home_overview() {
        let navigator = Navigator::default();
        assert_eq!(navigator.current_page(), Page::Home);
        assert_eq!(navigator.current_home_tab(), HomeTab::Overview);
    }

    #[test]
    fn each_page_triggers_its_own_load() {
        let mut navigator = Navigator::default();
        let loads: Vec<Option<LoadAction>> = Page::ALL
            .into_iter()
            .map(|page| navigator.activate_page(page).map(|ticket| ticket.action))
            .collect();
        assert_eq!(
            loads,
            vec![
                Some(LoadAction::Dashboard),
                Some(LoadAction::PlannerInit),
                Some(LoadAction::Programs),
                None,
            ]
        );
        assert_eq!(navigator.current_page(), Page::Classes);
    }

    #[test]
    fn day_to_day_tab_loads_but_overview_does_not() {
        let mut navigator = Navigator::default();
        assert_eq!(
            navigator.activate_home_tab(HomeTab::DayToDay).map(|t| t.action),
            Some(LoadAction::DayToDay)
        );
        assert_eq!(navigator.activate_home_tab(HomeTab::Overview), None);
    }

    #[test]
    fn slugs_round_trip_and_reject_unknown() {
        for page in Page::ALL {
            assert_eq!(Page::from_slug(page.slug()), Some(page));
        }
        assert_eq!(HomeTab::from_slug("day-to-day"), Some(HomeTab::DayToDay));
        assert_eq!(Page::from_slug("billing"), None);
    }

    #[test]
    fn newer_ticket_makes_older_one_stale() {
        let mut navigator = Navigator::default();
        let first = navigator.activate_page(Page::Home).unwrap();
        let second = navigator.activate_page(Page::Home).unwrap();
        assert!(!navigator.is_current(&first));
        assert!(navigator.is_current(&second));
    }

    #[test]
    fn leaving_a_page_makes_its_ticket_stale() {
        let mut navigator = Navigator::default();
        let home = navigator.activate_page(Page::Home).unwrap();
        let planner = navigator.activate_page(Page::Planner).unwrap();
        assert!(!navigator.is_current(&home));
        assert!(navigator.is_current(&planner));
    }

    #[test]
    fn reset_makes_in_flight_tickets_stale() {
        let mut navigator = Navigator::default();
        let home = navigator.activate_page(Page::Home).unwrap();
        navigator.reset();
        assert_eq!(navigator.current_page(), Page::Home);
        assert!(!navigator.is_current(&home));

        let fresh = navigator.activate_page(Page::Home).unwrap();
        assert!(navigator.is_current(&fresh));
    }

    #[test]
    fn day_to_day_ticket_needs_home_page_and_tab() {
        let mut navigator = Navigator::default();
        let ticket = navigator.activate_home_tab(HomeTab::DayToDay).unwrap();
        assert!(navigator.is_current(&ticket));
        navigator.activate_page(Page::Training);
        assert!(!navigator.is_current(&ticket));
    }

    #[test]
    fn reset_keeps_old_tickets_stale() {
        let mut navigator = Navigator::default();
        navigator.activate_page(Page::Planner);
        let planner = navigator.issue(LoadAction::PlannerInit);
        navigator.reset();
        assert_eq!(navigator.current_page(), Page::Home);
        assert!(!navigator.is_current(&planner));
    }
}
