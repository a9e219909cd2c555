use axum::extract::{Form, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use maud::Markup;
use models::site_content::{self, keys};
use serde::Deserialize;
use serde_json::json;
use service::content::blocks::{FooterContent, HeaderContent, StatsContent};
use service::lead::RelayError;
use tracing::warn;
use uuid::Uuid;

use crate::errors::PageError;
use crate::seo::{DocumentHead, PageKind, PageMeta};
use crate::state::AppState;
use crate::views::editable::EditCtx;
use crate::views::sections::{self, ContactForm};
use crate::views::{self, Notice};

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub notice: Option<String>,
}

fn notice(params: &PageParams) -> Option<Notice> {
    params.notice.as_deref().and_then(Notice::from_code)
}

fn find<'a>(blocks: &'a [site_content::Model], key: &str) -> Option<&'a site_content::Model> {
    blocks.iter().find(|b| b.block_key == key)
}

/// Shared footer: footer block plus the active contacts.
async fn footer(state: &AppState, ctx: &EditCtx<'_>, blocks: &[site_content::Model]) -> Result<Markup, PageError> {
    let contacts = state.store.contacts().list().await?;
    Ok(sections::footer(ctx, &FooterContent::from_block(find(blocks, keys::FOOTER)), &contacts))
}

async fn render_home(state: &AppState, notice: Option<Notice>, form: &ContactForm) -> Result<Markup, PageError> {
    let store = &state.store;
    let (services, features, contacts, blocks) =
        (store.services(), store.features(), store.contacts(), store.site_content());
    let (services, features, contacts, blocks) =
        tokio::try_join!(services.list(), features.list(), contacts.list(), blocks.list_all())?;
    let ctx = EditCtx::new(&state.edit, "/");
    let header = |key: &str| HeaderContent::from_block(key, find(&blocks, key));

    let mut head = DocumentHead::default();
    head.set_page_metadata(&state.site, PageMeta::new(&state.site).url(state.site.base_url.clone()), PageKind::Home);

    let main = maud::html! {
        (sections::hero(&ctx, &header(keys::HERO), &StatsContent::from_block(find(&blocks, keys::STATS))))
        (sections::services(&ctx, &header(keys::SERVICES_HEADER), &services))
        (sections::why_us(&ctx, &header(keys::WHY_US_HEADER), &features))
        (sections::contacts(&ctx, &header(keys::CONTACTS_HEADER), &contacts, form))
    };
    let footer = sections::footer(&ctx, &FooterContent::from_block(find(&blocks, keys::FOOTER)), &contacts);
    Ok(views::page(&head, ctx.on, "/", notice, main, footer))
}

/// 首页
pub async fn home(State(state): State<AppState>, Query(params): Query<PageParams>) -> Result<Markup, PageError> {
    render_home(&state, notice(&params), &ContactForm::default()).await
}

/// 全部服务（按类别分组）
pub async fn services_page(State(state): State<AppState>, Query(params): Query<PageParams>) -> Result<Markup, PageError> {
    let (services, blocks) = (state.store.services(), state.store.site_content());
    let (services, blocks) = tokio::try_join!(services.list(), blocks.list_all())?;
    let ctx = EditCtx::new(&state.edit, "/services");

    let mut head = DocumentHead::default();
    let meta = PageMeta::new(&state.site)
        .title("Услуги | Clean House")
        .description("Полный список клининговых услуг Clean House: уборка, химчистка мебели, мойка окон в Донецке.")
        .url(format!("{}/services", state.site.base_url));
    head.set_page_metadata(&state.site, meta, PageKind::Services(&services));

    let header = HeaderContent::from_block(keys::SERVICES_HEADER, find(&blocks, keys::SERVICES_HEADER));
    let main = sections::services_page(&ctx, &header, &services);
    let footer = footer(&state, &ctx, &blocks).await?;
    Ok(views::page(&head, ctx.on, "/services", notice(&params), main, footer))
}

/// 服务详情；未知或已下线的服务返回 404 页面
pub async fn service_detail(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Response, PageError> {
    let (services, blocks) = (state.store.services(), state.store.site_content());
    let (services, blocks) = tokio::try_join!(services.list(), blocks.list_all())?;
    let found = raw_id.parse::<Uuid>().ok().and_then(|id| services.iter().find(|s| s.id == id));
    let return_to = format!("/services/{raw_id}");
    let ctx = EditCtx::new(&state.edit, &return_to);
    let footer = footer(&state, &ctx, &blocks).await?;

    let mut head = DocumentHead::default();
    let Some(service) = found else {
        let meta = PageMeta::new(&state.site).title("Услуга не найдена | Clean House");
        head.set_page_metadata(&state.site, meta, PageKind::Other);
        let page = views::page(&head, ctx.on, "/services", None, sections::service_not_found(), footer);
        return Ok((StatusCode::NOT_FOUND, page).into_response());
    };

    let meta = PageMeta::new(&state.site)
        .title(format!("{} | Clean House", service.title))
        .description(service.description.clone())
        .url(format!("{}/services/{}", state.site.base_url, service.id))
        .og_type("article");
    head.set_page_metadata(&state.site, meta, PageKind::Service(service));
    let main = sections::service_detail(&ctx, service);
    Ok(views::page(&head, ctx.on, &return_to, notice(&params), main, footer).into_response())
}

/// 联系表单提交：成功后重定向并清空表单，失败时保留已填写内容
pub async fn submit_contact(State(state): State<AppState>, Form(form): Form<ContactForm>) -> Result<Response, PageError> {
    let payload = json!({ "name": form.name, "phone": form.phone, "message": form.message });
    match state.relay.handle_value(&payload).await {
        Ok(()) => Ok(Redirect::to("/?notice=lead_sent#contacts").into_response()),
        Err(e) => {
            let (status, code) = match e {
                RelayError::MissingFields => (StatusCode::BAD_REQUEST, "lead_invalid"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "lead_failed"),
            };
            warn!(event = "contact_form_failed", error = %e);
            let page = render_home(&state, Notice::from_code(code), &form).await?;
            Ok((status, page).into_response())
        }
    }
}
