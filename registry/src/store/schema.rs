use tokio_postgres::Client;

/// One step of the `registrations` schema. Versions are applied in order, once.
pub struct Migration {
    pub version: i32,
    pub description: &'static str,
    pub sql: &'static str,
}

pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "create registrations",
        sql: r#"
            CREATE TABLE IF NOT EXISTS "public"."registrations" (
                "id" text NOT NULL,
                "first_name" text NOT NULL,
                "middle_name" text,
                "last_name" text NOT NULL,
                "email" text,
                "age" int4 NOT NULL CHECK ("age" > 0),
                "country" text NOT NULL,
                "address" text NOT NULL,
                "phone" text NOT NULL,
                "form_uploaded" boolean NOT NULL DEFAULT false,
                "created_at" timestamptz NOT NULL DEFAULT now(),
                PRIMARY KEY ("id")
            );

            CREATE UNIQUE INDEX IF NOT EXISTS "registrations_email_key"
                ON "public"."registrations" (lower("email"));

            CREATE INDEX IF NOT EXISTS "registrations_uploaded_created_at_idx"
                ON "public"."registrations" ("form_uploaded", "created_at" DESC);
        "#,
    },
    Migration {
        version: 2,
        description: "add gender and amount paid",
        sql: r#"
            ALTER TABLE "public"."registrations" ADD COLUMN IF NOT EXISTS "gender" text;
            ALTER TABLE "public"."registrations" ADD COLUMN IF NOT EXISTS "amount_paid" float8;
        "#,
    },
];

pub fn latest_version() -> i32 {
    MIGRATIONS.last().map(|m| m.version).unwrap_or(0)
}

pub fn pending_migrations(current_version: i32) -> impl Iterator<Item = &'static Migration> {
    MIGRATIONS
        .iter()
        .filter(move |migration| migration.version > current_version)
}

const CREATE_MIGRATIONS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS "public"."schema_migrations" (
        "version" int4 NOT NULL,
        "description" text NOT NULL,
        "applied_at" timestamptz NOT NULL DEFAULT now(),
        PRIMARY KEY ("version")
    );
"#;

/// Brings the schema up to `latest_version`, returns the version it started from
pub async fn migrate(client: &mut Client) -> Result<i32, tokio_postgres::Error> {
    client.batch_execute(CREATE_MIGRATIONS_TABLE).await?;

    let transaction = client.transaction().await?;

    // Serializes concurrent start-ups against the same database
    transaction
        .batch_execute(r#"LOCK TABLE "public"."schema_migrations" IN EXCLUSIVE MODE;"#)
        .await?;

    let current_version: i32 = transaction
        .query_one(
            r#"SELECT COALESCE(MAX("version"), 0) FROM "public"."schema_migrations";"#,
            &[],
        )
        .await?
        .get(0);

    for migration in pending_migrations(current_version) {
        log::info!(
            "Applying schema migration [Version: {}, Description: {}]",
            migration.version,
            migration.description
        );

        transaction.batch_execute(migration.sql).await?;

        transaction
            .execute(
                r#"INSERT INTO "public"."schema_migrations" ("version", "description") VALUES ($1, $2);"#,
                &[&migration.version, &migration.description],
            )
            .await?;
    }

    transaction.commit().await?;

    Ok(current_version)
}
