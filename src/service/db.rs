//! Database operations for services.

use rusqlite::Connection;

use crate::{
    Error,
    profile::map_profile_row,
    service::{NewService, Service, ServiceWithProfile},
};

/// Create a service and return it with its generated ID.
///
/// Fails with [Error::InvalidForeignKey] if the profile does not exist.
pub fn create_service(service: NewService, connection: &Connection) -> Result<Service, Error> {
    connection.execute(
        "INSERT INTO service (name, description, price, profile_id) VALUES (?1, ?2, ?3, ?4);",
        (
            &service.name,
            &service.description,
            service.price,
            service.profile_id,
        ),
    )?;

    Ok(Service {
        id: connection.last_insert_rowid(),
        name: service.name,
        description: service.description,
        price: service.price,
        profile_id: service.profile_id,
    })
}

/// Retrieve all services with their owning profile, ordered by name.
pub fn get_services(connection: &Connection) -> Result<Vec<ServiceWithProfile>, Error> {
    connection
        .prepare(
            "SELECT s.id, s.name, s.description, s.price, s.profile_id,
                p.id, p.name, p.type, p.currency
            FROM service s
            INNER JOIN profile p ON p.id = s.profile_id
            ORDER BY s.name ASC, s.id ASC;",
        )?
        .query_map([], |row| {
            Ok(ServiceWithProfile {
                service: Service {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    description: row.get(2)?,
                    price: row.get(3)?,
                    profile_id: row.get(4)?,
                },
                profile: map_profile_row(row, 5)?,
            })
        })?
        .map(|maybe_service| maybe_service.map_err(|error| error.into()))
        .collect()
}

/// Initialize the service table.
pub fn create_service_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS service (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT,
            price REAL NOT NULL,
            profile_id INTEGER NOT NULL,
            FOREIGN KEY(profile_id) REFERENCES profile(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_service_profile_id ON service(profile_id);",
    )?;

    Ok(())
}

#[cfg(test)]
mod service_query_tests {
    use crate::{
        Error,
        profile::{ProfileType, delete_profiles_by_type},
        service::{NewService, create_service, get_services},
        test_utils::{get_test_connection, must_create_profile},
    };

    fn new_service(name: &str, profile_id: i64) -> NewService {
        NewService {
            name: name.to_owned(),
            description: None,
            price: 150.0,
            profile_id,
        }
    }

    #[test]
    fn get_services_attaches_owning_profile() {
        let connection = get_test_connection();
        let personal = must_create_profile("Personal", ProfileType::Personal, &connection);
        let business = must_create_profile("Business", ProfileType::Business, &connection);
        create_service(new_service("Website", business.id), &connection).unwrap();
        create_service(new_service("Consulting", personal.id), &connection).unwrap();

        let services = get_services(&connection).expect("Could not get services");

        let got = services
            .iter()
            .map(|row| (row.service.name.as_str(), row.profile.name.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(got, [("Consulting", "Personal"), ("Website", "Business")]);
    }

    #[test]
    fn create_service_with_missing_profile_fails() {
        let connection = get_test_connection();

        let result = create_service(new_service("Website", 42), &connection);

        assert_eq!(result, Err(Error::InvalidForeignKey));
    }

    #[test]
    fn deleting_profile_deletes_its_services() {
        let connection = get_test_connection();
        let personal = must_create_profile("Personal", ProfileType::Personal, &connection);
        create_service(new_service("Tutoring", personal.id), &connection).unwrap();

        delete_profiles_by_type(ProfileType::Personal, &connection).unwrap();

        assert_eq!(get_services(&connection), Ok(vec![]));
    }
}
