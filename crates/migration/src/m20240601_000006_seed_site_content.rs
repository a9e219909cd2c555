//! Seed default site-content blocks so a fresh install renders sensible copy.
//! Existing rows are left alone.
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const SEED: &[(&str, &str)] = &[
    (
        "hero",
        r#"{"title":"Чистота и свежесть вашего дома","subtitle":"Профессиональный клининг в Донецке","description":"Доверьте уборку профессионалам. Мы используем безопасные технологии и современное оборудование для идеальной чистоты вашего пространства."}"#,
    ),
    ("stats", r#"{"years":"12+","clients":"1000+","cleanings":"2000+"}"#),
    (
        "services_header",
        r#"{"title":"Полный спектр клининговых услуг","subtitle":"Наши услуги","description":"Мы предлагаем широкий выбор услуг по уборке для жилых и коммерческих помещений"}"#,
    ),
    (
        "why_us_header",
        r#"{"title":"Почему выбирают нас","subtitle":"Преимущества","description":"Мы заботимся о вашем комфорте и гарантируем качество"}"#,
    ),
    (
        "contacts_header",
        r#"{"title":"Свяжитесь с нами","subtitle":"Контакты","description":"Оставьте заявку или позвоните нам — мы ответим на все вопросы и поможем выбрать подходящую услугу"}"#,
    ),
    (
        "footer",
        r#"{"description":"Профессиональные услуги клининга в Донецке. Чистота и уют в вашем доме."}"#,
    ),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        for (key, content) in SEED {
            let sql = format!(
                "INSERT INTO site_content (id, block_key, content) VALUES (gen_random_uuid(), '{key}', '{}'::jsonb) ON CONFLICT (block_key) DO NOTHING",
                content.replace('\'', "''")
            );
            db.execute_unprepared(&sql).await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let keys: Vec<String> = SEED.iter().map(|(k, _)| format!("'{k}'")).collect();
        let sql = format!("DELETE FROM site_content WHERE block_key IN ({})", keys.join(", "));
        manager.get_connection().execute_unprepared(&sql).await?;
        Ok(())
    }
}
