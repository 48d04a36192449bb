use crate::router::RouteTable;
use crate::router::views::resource_for;

#[test]
fn given_views_when_resource_for_then_maps_to_backend_paths() {
    let table = RouteTable::default();
    let resource = |path: &str| resource_for(&table.resolve(path).unwrap());

    assert_eq!(resource("/app/dashboard").as_deref(), Some("/dashboard-stats"));
    assert_eq!(resource("/app/users/12").as_deref(), Some("/users/12/profile"));
    assert_eq!(resource("/app/companies/3").as_deref(), Some("/companies/3/profile"));
    assert_eq!(resource("/app/admin").as_deref(), Some("/admin/app-users"));
    assert_eq!(resource("/app/followups").as_deref(), Some("/followups"));
}

#[test]
fn given_unprotected_views_when_resource_for_then_none() {
    let table = RouteTable::default();

    assert_eq!(resource_for(&table.resolve("/").unwrap()), None);
    assert_eq!(resource_for(&table.resolve("/nowhere").unwrap()), None);
    assert_eq!(resource_for(&table.resolve("/app").unwrap()), None);
}
