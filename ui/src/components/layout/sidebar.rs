use crate::Route;
use crate::hooks::{use_permissions, use_push_route};
use payloads::{AccessRequirement, PermissionEvaluator};
use yew::prelude::*;

/// A navigation item in the console sidebar.
///
/// An entry with no roles and no permissions is shown to every signed-in
/// user. Roles match any-of; permissions match any-of.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuEntry {
    pub title: &'static str,
    pub route: Route,
    pub roles: &'static [&'static str],
    pub permissions: &'static [&'static str],
}

impl MenuEntry {
    pub fn requirement(&self) -> AccessRequirement {
        AccessRequirement::permissions(self.permissions.iter().copied())
            .with_roles(self.roles.iter().copied())
    }
}

/// Sidebar navigation items. Add new pages here.
pub const MENU_ENTRIES: &[MenuEntry] = &[
    MenuEntry {
        title: "Dashboard",
        route: Route::Home,
        roles: &[],
        permissions: &[],
    },
    MenuEntry {
        title: "Services",
        route: Route::Services,
        roles: &[],
        permissions: &[],
    },
    MenuEntry {
        title: "Appointments",
        route: Route::Appointments,
        roles: &[],
        permissions: &["LichHen"],
    },
    MenuEntry {
        title: "Vaccination plans",
        route: Route::VaccinationPlans,
        roles: &[],
        permissions: &["KeHoachTiem"],
    },
    MenuEntry {
        title: "Inventory",
        route: Route::Inventory,
        roles: &["MANAGER", "DOCTOR"],
        permissions: &["LoVacXin", "PhieuNhap", "PhieuXuat", "PhieuHuy"],
    },
    MenuEntry {
        title: "Statistics",
        route: Route::Statistics,
        roles: &["MANAGER"],
        permissions: &["ThongKe"],
    },
];

/// The entries the user may see, in menu order.
pub fn visible_entries<'a>(
    entries: &'a [MenuEntry],
    evaluator: &PermissionEvaluator<'_>,
) -> Vec<&'a MenuEntry> {
    entries
        .iter()
        .filter(|entry| evaluator.satisfies(&entry.requirement()))
        .collect()
}

#[derive(Properties, PartialEq)]
pub struct SidebarProps {
    /// Current active route for highlighting.
    pub active_route: Route,
}

const LINK_BASE_CLASSES: &str =
    "block px-4 py-2 text-sm transition-colors cursor-pointer";
const LINK_INACTIVE_CLASSES: &str = "text-neutral-600 dark:text-neutral-400 \
    hover:text-neutral-900 dark:hover:text-white \
    hover:bg-neutral-100 dark:hover:bg-neutral-800";
const LINK_ACTIVE_CLASSES: &str = "text-neutral-900 dark:text-white \
    bg-neutral-100 dark:bg-neutral-800 font-medium";

#[function_component]
pub fn Sidebar(props: &SidebarProps) -> Html {
    let push_route = use_push_route();
    let permissions = use_permissions();
    let entries = visible_entries(MENU_ENTRIES, &permissions.evaluator());

    html! {
        <nav class="py-4">
            <ul>
                { for entries.into_iter().map(|entry| {
                    let is_active = props.active_route == entry.route;

                    let link_classes = format!(
                        "{} {}",
                        LINK_BASE_CLASSES,
                        if is_active { LINK_ACTIVE_CLASSES } else { LINK_INACTIVE_CLASSES }
                    );

                    let on_click = {
                        let push_route = push_route.clone();
                        let route = entry.route.clone();
                        Callback::from(move |_: MouseEvent| {
                            push_route.emit(route.clone());
                        })
                    };

                    html! {
                        <li key={entry.title}>
                            <div class={link_classes} onclick={on_click}>
                                {entry.title}
                            </div>
                        </li>
                    }
                })}
            </ul>
        </nav>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use payloads::{Permissions, Role, UserId, UserInfo};

    fn user(role: &str, codes: &[&str]) -> UserInfo {
        UserInfo {
            id: UserId::new(),
            name: "Pham D".into(),
            email: "d@example.com".into(),
            role: Role::from(role),
            permissions: Permissions::from_codes(codes),
        }
    }

    fn titles(user: Option<&UserInfo>) -> Vec<&'static str> {
        visible_entries(MENU_ENTRIES, &PermissionEvaluator::new(user))
            .into_iter()
            .map(|entry| entry.title)
            .collect()
    }

    #[test]
    fn customer_sees_unconstrained_entries_only() {
        let customer = user("USER", &[]);
        assert_eq!(titles(Some(&customer)), vec!["Dashboard", "Services"]);
    }

    #[test]
    fn doctor_sees_entries_matching_any_permission() {
        let doctor = user("DOCTOR", &["LichHen_ALL", "PhieuXuat_VIEW"]);
        assert_eq!(
            titles(Some(&doctor)),
            vec!["Dashboard", "Services", "Appointments", "Inventory"]
        );
    }

    #[test]
    fn role_and_permission_must_both_match() {
        let doctor_with_stats = user("DOCTOR", &["ThongKe_VIEW"]);
        assert!(!titles(Some(&doctor_with_stats)).contains(&"Statistics"));

        let manager = user("MANAGER", &["ThongKe_VIEW"]);
        assert!(titles(Some(&manager)).contains(&"Statistics"));
    }

    #[test]
    fn order_is_preserved() {
        let manager = user(
            "MANAGER",
            &["ThongKe_ALL", "KeHoachTiem_VIEW", "LichHen_VIEW", "LoVacXin_ALL"],
        );
        assert_eq!(
            titles(Some(&manager)),
            vec![
                "Dashboard",
                "Services",
                "Appointments",
                "Vaccination plans",
                "Inventory",
                "Statistics",
            ]
        );
    }

    #[test]
    fn without_a_user_only_unconstrained_entries_show() {
        assert_eq!(titles(None), vec!["Dashboard", "Services"]);
    }
}
