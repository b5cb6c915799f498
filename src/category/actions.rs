//! The operations on expense categories used by pages and endpoints.
//!
//! Each mutating action invalidates the views that render categories once the
//! database accepts the change. Errors from the database are returned as is;
//! in particular the existence of the owning profile is checked by its foreign
//! key, not here.

use rusqlite::Connection;

use crate::{
    Error,
    category::{
        CategoryId, CategoryName, CategoryUpdate, CategoryWithProfile, ExpenseCategory,
        db::{delete_category_row, get_category, insert_category, select_categories, update_category_row},
    },
    endpoints,
    profile::ProfileId,
    view::InvalidateView,
};

/// Views that show categories or depend on them, e.g. the transaction form.
const CATEGORY_DEPENDENT_VIEWS: [&str; 3] = [
    endpoints::CATEGORIES_VIEW,
    endpoints::HOME_VIEW,
    endpoints::NEW_TRANSACTION_VIEW,
];

/// List the categories of `profile_id`, or of all profiles when `None`.
///
/// Categories are ordered by name and each one carries its owning profile.
pub fn list_categories(
    profile_id: Option<ProfileId>,
    connection: &Connection,
) -> Result<Vec<CategoryWithProfile>, Error> {
    select_categories(profile_id, connection)
}

/// Create a category for `profile_id`.
///
/// # Errors
///
/// Returns [Error::InvalidForeignKey] if the profile does not exist.
pub fn create_category(
    name: CategoryName,
    profile_id: ProfileId,
    connection: &Connection,
    views: &dyn InvalidateView,
) -> Result<ExpenseCategory, Error> {
    let category = insert_category(name, profile_id, connection)?;

    views.invalidate(endpoints::CATEGORIES_VIEW);
    views.invalidate(endpoints::HOME_VIEW);

    Ok(category)
}

/// Delete the category with `category_id`.
///
/// # Errors
///
/// Returns [Error::DeleteMissingCategory] if there is no such category.
pub fn delete_category(
    category_id: CategoryId,
    connection: &Connection,
    views: &dyn InvalidateView,
) -> Result<(), Error> {
    if delete_category_row(category_id, connection)? == 0 {
        return Err(Error::DeleteMissingCategory);
    }

    invalidate_dependent_views(views);

    Ok(())
}

/// Apply `update` to the category with `category_id` and return the stored category.
///
/// # Errors
///
/// Returns [Error::UpdateMissingCategory] if there is no such category.
pub fn update_category(
    category_id: CategoryId,
    update: CategoryUpdate,
    connection: &Connection,
    views: &dyn InvalidateView,
) -> Result<ExpenseCategory, Error> {
    if update_category_row(category_id, &update, connection)? == 0 {
        return Err(Error::UpdateMissingCategory);
    }

    invalidate_dependent_views(views);

    get_category(category_id, connection)
}

fn invalidate_dependent_views(views: &dyn InvalidateView) {
    for view in CATEGORY_DEPENDENT_VIEWS {
        views.invalidate(view);
    }
}

#[cfg(test)]
mod category_action_tests {
    use rusqlite::Connection;

    use crate::{
        Error, endpoints,
        category::{CategoryName, CategoryUpdate, get_category},
        profile::{Profile, ProfileType},
        test_utils::{get_test_connection, must_create_profile},
        view::test_views::RecordingViews,
    };

    use super::{create_category, delete_category, list_categories, update_category};

    fn get_profiles(connection: &Connection) -> (Profile, Profile) {
        (
            must_create_profile("Personal", ProfileType::Personal, connection),
            must_create_profile("Business", ProfileType::Business, connection),
        )
    }

    fn names(connection: &Connection, profile_id: Option<i64>) -> Vec<String> {
        list_categories(profile_id, connection)
            .expect("Could not list categories")
            .into_iter()
            .map(|row| row.category.name.to_string())
            .collect()
    }

    #[test]
    fn list_filters_by_profile() {
        let connection = get_test_connection();
        let views = RecordingViews::default();
        let (personal, business) = get_profiles(&connection);
        create_category(CategoryName::new_unchecked("Aluguel"), personal.id, &connection, &views)
            .unwrap();
        create_category(CategoryName::new_unchecked("Luz"), business.id, &connection, &views)
            .unwrap();

        assert_eq!(names(&connection, Some(personal.id)), ["Aluguel"]);
        assert_eq!(names(&connection, Some(business.id)), ["Luz"]);
    }

    #[test]
    fn list_without_profile_returns_all_ordered_by_name() {
        let connection = get_test_connection();
        let views = RecordingViews::default();
        let (personal, business) = get_profiles(&connection);
        for (name, profile_id) in [
            ("Luz", business.id),
            ("Água", personal.id),
            ("Aluguel", personal.id),
            ("Internet", business.id),
        ] {
            create_category(CategoryName::new_unchecked(name), profile_id, &connection, &views)
                .unwrap();
        }

        let all = list_categories(None, &connection).unwrap();

        let got = all
            .iter()
            .map(|row| row.category.name.as_ref())
            .collect::<Vec<_>>();
        assert_eq!(got, ["Aluguel", "Internet", "Luz", "Água"]);
        for row in &all {
            assert_eq!(row.category.profile_id, row.profile.id);
        }
    }

    #[test]
    fn list_for_profile_without_categories_is_empty() {
        let connection = get_test_connection();
        let (personal, _) = get_profiles(&connection);

        assert!(names(&connection, Some(personal.id)).is_empty());
    }

    #[test]
    fn create_then_list_includes_row_once() {
        let connection = get_test_connection();
        let views = RecordingViews::default();
        let (personal, _) = get_profiles(&connection);

        let category =
            create_category(CategoryName::new_unchecked("Mercado"), personal.id, &connection, &views)
                .unwrap();

        let matching = list_categories(None, &connection)
            .unwrap()
            .into_iter()
            .filter(|row| row.category.id == category.id)
            .count();
        assert_eq!(matching, 1);
    }

    #[test]
    fn create_invalidates_categories_and_home() {
        let connection = get_test_connection();
        let views = RecordingViews::default();
        let (personal, _) = get_profiles(&connection);

        create_category(CategoryName::new_unchecked("Mercado"), personal.id, &connection, &views)
            .unwrap();

        assert_eq!(
            views.invalidated(),
            [endpoints::CATEGORIES_VIEW, endpoints::HOME_VIEW]
        );
    }

    #[test]
    fn create_with_missing_profile_fails_without_invalidating() {
        let connection = get_test_connection();
        let views = RecordingViews::default();

        let result =
            create_category(CategoryName::new_unchecked("Mercado"), 404, &connection, &views);

        assert_eq!(result, Err(Error::InvalidForeignKey));
        assert!(views.invalidated().is_empty());
    }

    #[test]
    fn delete_then_list_excludes_row() {
        let connection = get_test_connection();
        let views = RecordingViews::default();
        let (personal, _) = get_profiles(&connection);
        let keep =
            create_category(CategoryName::new_unchecked("Luz"), personal.id, &connection, &views)
                .unwrap();
        let remove =
            create_category(CategoryName::new_unchecked("Gás"), personal.id, &connection, &views)
                .unwrap();

        delete_category(remove.id, &connection, &views).expect("Could not delete category");

        let ids = list_categories(None, &connection)
            .unwrap()
            .into_iter()
            .map(|row| row.category.id)
            .collect::<Vec<_>>();
        assert_eq!(ids, [keep.id]);
    }

    #[test]
    fn delete_invalidates_dependent_views() {
        let connection = get_test_connection();
        let (personal, _) = get_profiles(&connection);
        let category = create_category(
            CategoryName::new_unchecked("Luz"),
            personal.id,
            &connection,
            &RecordingViews::default(),
        )
        .unwrap();
        let views = RecordingViews::default();

        delete_category(category.id, &connection, &views).unwrap();

        assert_eq!(
            views.invalidated(),
            [
                endpoints::CATEGORIES_VIEW,
                endpoints::HOME_VIEW,
                endpoints::NEW_TRANSACTION_VIEW
            ]
        );
    }

    #[test]
    fn delete_missing_category_fails() {
        let connection = get_test_connection();
        let views = RecordingViews::default();

        let result = delete_category(1337, &connection, &views);

        assert_eq!(result, Err(Error::DeleteMissingCategory));
        assert!(views.invalidated().is_empty());
    }

    #[test]
    fn update_renames_category() {
        let connection = get_test_connection();
        let views = RecordingViews::default();
        let (personal, _) = get_profiles(&connection);
        let category =
            create_category(CategoryName::new_unchecked("Lus"), personal.id, &connection, &views)
                .unwrap();
        let update = CategoryUpdate {
            name: Some(CategoryName::new_unchecked("Luz")),
        };

        let updated = update_category(category.id, update, &connection, &views).unwrap();

        assert_eq!(updated.name.as_ref(), "Luz");
        assert_eq!(updated.profile_id, personal.id);
        assert_eq!(get_category(category.id, &connection), Ok(updated));
    }

    #[test]
    fn update_without_fields_keeps_category_and_invalidates() {
        let connection = get_test_connection();
        let (personal, _) = get_profiles(&connection);
        let category = create_category(
            CategoryName::new_unchecked("Luz"),
            personal.id,
            &connection,
            &RecordingViews::default(),
        )
        .unwrap();
        let views = RecordingViews::default();

        let updated =
            update_category(category.id, CategoryUpdate::default(), &connection, &views).unwrap();

        assert_eq!(updated, category);
        assert_eq!(views.invalidated().len(), 3);
    }

    #[test]
    fn update_missing_category_fails() {
        let connection = get_test_connection();
        let views = RecordingViews::default();
        let update = CategoryUpdate {
            name: Some(CategoryName::new_unchecked("Luz")),
        };

        let result = update_category(1337, update, &connection, &views);

        assert_eq!(result, Err(Error::UpdateMissingCategory));
        assert!(views.invalidated().is_empty());
    }
}
