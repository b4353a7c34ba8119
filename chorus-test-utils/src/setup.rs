use mockito::{Mock, Server, ServerGuard};
use sea_orm::{sea_query::TableCreateStatement, ConnectionTrait, Database, DatabaseConnection};

use crate::error::TestError;

pub struct TestAppState {
    pub db: DatabaseConnection,
}

pub struct TestSetup {
    pub server: ServerGuard,
    pub state: TestAppState,
    pub mocks: Vec<Mock>,
}

impl TestSetup {
    pub async fn new() -> Result<Self, TestError> {
        let mock_server = Server::new_async().await;

        let db = Database::connect("sqlite::memory:").await.unwrap();

        Ok(TestSetup {
            server: mock_server,
            state: TestAppState { db },
            mocks: Vec::new(),
        })
    }

    pub async fn with_tables(&self, stmts: Vec<TableCreateStatement>) -> Result<(), TestError> {
        for stmt in stmts {
            self.state.db.execute(&stmt).await?;
        }

        Ok(())
    }

    /// Assert all mock endpoints were called as expected.
    ///
    /// Calls `assert_async()` on all mocks registered through the fixtures to
    /// verify they were invoked the expected number of times.
    ///
    /// # Panics
    /// Panics if any mock endpoint was not called the expected number of times
    pub async fn assert_mocks(&self) {
        for mock in &self.mocks {
            mock.assert_async().await;
        }
    }
}

#[macro_export]
macro_rules! test_setup_with_tables {
    // Pattern 1: No entities provided
    () => {{
        TestSetup::new().await
    }};

    // Pattern 2: Entities provided
    ($($entity:expr),+ $(,)?) => {{
        async {
            let setup = TestSetup::new().await?;

            let schema = sea_orm::Schema::new(sea_orm::DbBackend::Sqlite);
            let stmts = vec![
                $(schema.create_table_from_entity($entity),)+
            ];
            setup.with_tables(stmts).await?;

            Ok::<_, $crate::error::TestError>(setup)
        }.await
    }};
}

#[macro_export]
macro_rules! test_setup_with_chart_tables {
    // Pattern 1: No entities provided
    () => {{
        async {
            let setup = TestSetup::new().await?;

            let schema = sea_orm::Schema::new(sea_orm::DbBackend::Sqlite);
            let stmts = vec![
                schema.create_table_from_entity(entity::prelude::ChorusGroup),
                schema.create_table_from_entity(entity::prelude::ChorusMember),
                schema.create_table_from_entity(entity::prelude::MemberWeekSnapshot),
                schema.create_table_from_entity(entity::prelude::MemberWeekPlay),
                schema.create_table_from_entity(entity::prelude::MemberWeekScore),
                schema.create_table_from_entity(entity::prelude::GroupWeekChart),
                schema.create_table_from_entity(entity::prelude::GroupWeekEntry),
                schema.create_table_from_entity(entity::prelude::GroupGenerationState),
                schema.create_table_from_entity(entity::prelude::GroupAlltimeEntry),
                schema.create_table_from_entity(entity::prelude::GroupEntryHistory),
                schema.create_table_from_entity(entity::prelude::GroupMemberContribution),
                schema.create_table_from_entity(entity::prelude::GroupRecord)
            ];
            setup.with_tables(stmts).await?;

            Ok::<_, $crate::error::TestError>(setup)
        }.await
    }};

    // Pattern 2: Entities provided
    ($($entity:expr),+ $(,)?) => {{
        async {
            let setup = TestSetup::new().await?;

            let schema = sea_orm::Schema::new(sea_orm::DbBackend::Sqlite);
            let stmts = vec![
                schema.create_table_from_entity(entity::prelude::ChorusGroup),
                schema.create_table_from_entity(entity::prelude::ChorusMember),
                schema.create_table_from_entity(entity::prelude::MemberWeekSnapshot),
                schema.create_table_from_entity(entity::prelude::MemberWeekPlay),
                schema.create_table_from_entity(entity::prelude::MemberWeekScore),
                schema.create_table_from_entity(entity::prelude::GroupWeekChart),
                schema.create_table_from_entity(entity::prelude::GroupWeekEntry),
                schema.create_table_from_entity(entity::prelude::GroupGenerationState),
                schema.create_table_from_entity(entity::prelude::GroupAlltimeEntry),
                schema.create_table_from_entity(entity::prelude::GroupEntryHistory),
                schema.create_table_from_entity(entity::prelude::GroupMemberContribution),
                schema.create_table_from_entity(entity::prelude::GroupRecord),
                $(schema.create_table_from_entity($entity),)+
            ];
            setup.with_tables(stmts).await?;

            Ok::<_, $crate::error::TestError>(setup)
        }.await
    }};
}
