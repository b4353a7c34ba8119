//! HTTP endpoints for group charts, generation control, and derived statistics.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDateTime;
use sea_orm::ActiveEnum;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    model::api::{
        ChartEntryDto, ContributionDto, ErrorDto, GenerateChartsDto, GenerationStatusDto,
        GroupChartsDto, RecordDto,
    },
    server::{
        data::{
            chart::ChartRepository, contribution::ContributionRepository,
            group::GroupRepository, record::RecordRepository,
        },
        error::{chart::ChartError, Error},
        model::{app::AppState, task::TaskJob},
        service::generation::GenerationService,
    },
};

pub static CHART_TAG: &str = "chart";

/// Week selector for the chart lookup endpoint.
#[derive(Deserialize, IntoParams)]
pub struct ChartWeekQuery {
    /// Inclusive week start, midnight UTC on the group's tracking day,
    /// e.g. `2026-01-04T00:00:00`.
    pub week_start: NaiveDateTime,
}

/// Start chart generation for a group
///
/// Applies any provided chart settings to the group, then generates all finished weeks
/// the group is missing in the background. The response is the status snapshot taken
/// right after the run was accepted; poll the status endpoint for progress.
#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/charts/generate",
    tag = CHART_TAG,
    params(("group_id" = i32, Path, description = "Group to generate charts for")),
    request_body = GenerateChartsDto,
    responses(
        (status = 202, description = "Generation accepted and running in the background", body = GenerationStatusDto),
        (status = 400, description = "Invalid chart mode, size, or tracking day", body = ErrorDto),
        (status = 404, description = "Group not found", body = ErrorDto),
        (status = 409, description = "Chart generation is already in progress for this group", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn generate_charts(
    State(state): State<AppState>,
    Path(group_id): Path<i32>,
    Json(settings): Json<GenerateChartsDto>,
) -> Result<impl IntoResponse, Error> {
    let generation_service = GenerationService::new(
        &state.db,
        &state.scrobble_client,
        &state.analytics,
        &state.tasks,
        &state.policy,
    );

    let status = generation_service.start(group_id, &settings).await?;

    Ok((StatusCode::ACCEPTED, Json(status)).into_response())
}

/// Get the generation status of a group
///
/// Reports whether a run holds the generation lease, its stage and week progress, the
/// members skipped after repeated fetch failures, and whether the most recent run
/// aborted. Reading the status also reclaims the lease of a run that died, so a stuck
/// group heals on its next status poll.
#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/charts/status",
    tag = CHART_TAG,
    params(("group_id" = i32, Path, description = "Group to report status for")),
    responses(
        (status = 200, description = "Current generation status", body = GenerationStatusDto),
        (status = 404, description = "Group not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_generation_status(
    State(state): State<AppState>,
    Path(group_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let generation_service = GenerationService::new(
        &state.db,
        &state.scrobble_client,
        &state.analytics,
        &state.tasks,
        &state.policy,
    );

    let status = generation_service.status(group_id).await?;

    Ok((StatusCode::OK, Json(status)).into_response())
}

/// Get a group's most recent weekly charts
#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/charts/latest",
    tag = CHART_TAG,
    params(("group_id" = i32, Path, description = "Group to fetch charts for")),
    responses(
        (status = 200, description = "The group's most recent chart week", body = GroupChartsDto),
        (status = 404, description = "Group not found or no charts generated yet", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_latest_charts(
    State(state): State<AppState>,
    Path(group_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let group_repository = GroupRepository::new(&state.db);
    let chart_repository = ChartRepository::new(&state.db);

    let group = group_repository
        .get(group_id)
        .await?
        .ok_or(ChartError::GroupNotFound(group_id))?;

    let chart = if let Some(chart) = chart_repository.find_latest(group_id).await? {
        chart
    } else {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(ErrorDto {
                error: "No charts have been generated for this group".to_string(),
            }),
        )
            .into_response());
    };

    let entries = chart_repository.get_entries(chart.id).await?;

    Ok((StatusCode::OK, Json(charts_dto(&group, &chart, entries))).into_response())
}

/// Get a group's weekly charts for a specific week
#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/charts",
    tag = CHART_TAG,
    params(
        ("group_id" = i32, Path, description = "Group to fetch charts for"),
        ChartWeekQuery
    ),
    responses(
        (status = 200, description = "The group's chart for the requested week", body = GroupChartsDto),
        (status = 404, description = "Group not found or no chart stored for that week", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_week_charts(
    State(state): State<AppState>,
    Path(group_id): Path<i32>,
    Query(query): Query<ChartWeekQuery>,
) -> Result<impl IntoResponse, Error> {
    let group_repository = GroupRepository::new(&state.db);
    let chart_repository = ChartRepository::new(&state.db);

    let group = group_repository
        .get(group_id)
        .await?
        .ok_or(ChartError::GroupNotFound(group_id))?;

    let chart = if let Some(chart) = chart_repository
        .find_by_week(group_id, query.week_start)
        .await?
    {
        chart
    } else {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(ErrorDto {
                error: "No chart stored for that week".to_string(),
            }),
        )
            .into_response());
    };

    let entries = chart_repository.get_entries(chart.id).await?;

    Ok((StatusCode::OK, Json(charts_dto(&group, &chart, entries))).into_response())
}

/// Get the contribution leaderboard of a group
///
/// Totals are accumulated incrementally as weeks are generated; members who left the
/// group are omitted.
#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/contributions",
    tag = CHART_TAG,
    params(("group_id" = i32, Path, description = "Group to fetch contributions for")),
    responses(
        (status = 200, description = "Member contribution totals, highest score first", body = Vec<ContributionDto>),
        (status = 404, description = "Group not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_contributions(
    State(state): State<AppState>,
    Path(group_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let group_repository = GroupRepository::new(&state.db);
    let contribution_repository = ContributionRepository::new(&state.db);

    group_repository
        .get(group_id)
        .await?
        .ok_or(ChartError::GroupNotFound(group_id))?;

    let rows = contribution_repository
        .get_by_group_with_members(group_id)
        .await?;

    let contribution_dtos: Vec<ContributionDto> = rows
        .into_iter()
        .filter_map(|(contribution, member)| {
            member.map(|member| ContributionDto {
                member_id: contribution.member_id,
                username: member.username,
                total_score: contribution.total_score,
                total_playcount: contribution.total_playcount,
                artist_debuts: contribution.artist_debuts,
                track_debuts: contribution.track_debuts,
                album_debuts: contribution.album_debuts,
                artist_number_ones: contribution.artist_number_ones,
                track_number_ones: contribution.track_number_ones,
                album_number_ones: contribution.album_number_ones,
                mvp_weeks: contribution.mvp_weeks,
                updated_at: contribution.updated_at,
            })
        })
        .collect();

    Ok((StatusCode::OK, Json(contribution_dtos)).into_response())
}

/// Get the listening records of a group
#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/records",
    tag = CHART_TAG,
    params(("group_id" = i32, Path, description = "Group to fetch records for")),
    responses(
        (status = 200, description = "Current record holders per category and kind", body = Vec<RecordDto>),
        (status = 404, description = "Group not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_records(
    State(state): State<AppState>,
    Path(group_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let group_repository = GroupRepository::new(&state.db);
    let record_repository = RecordRepository::new(&state.db);

    group_repository
        .get(group_id)
        .await?
        .ok_or(ChartError::GroupNotFound(group_id))?;

    let records = record_repository.get_by_group(group_id).await?;

    let record_dtos: Vec<RecordDto> = records
        .into_iter()
        .map(|record| RecordDto {
            category: record.category.to_value(),
            record_kind: record.record_kind.to_value(),
            name: record.name,
            artist: record.artist,
            value: record.value,
            week_start: record.week_start,
            updated_at: record.updated_at,
        })
        .collect();

    Ok((StatusCode::OK, Json(record_dtos)).into_response())
}

/// Rebuild a group's derived statistics in the background
///
/// Queues a full replay of the group's stored weeks, replacing entry history, member
/// contributions, the all-time ranking, and records. Useful after regenerating weeks
/// with different settings, which repairs any counter drift the overlap left behind.
#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/stats/rebuild",
    tag = CHART_TAG,
    params(("group_id" = i32, Path, description = "Group whose statistics are rebuilt")),
    responses(
        (status = 202, description = "Rebuild queued"),
        (status = 404, description = "Group not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn rebuild_stats(
    State(state): State<AppState>,
    Path(group_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let group_repository = GroupRepository::new(&state.db);

    group_repository
        .get(group_id)
        .await?
        .ok_or(ChartError::GroupNotFound(group_id))?;

    state.tasks.push(TaskJob::RebuildStats { group_id }).await?;

    Ok(StatusCode::ACCEPTED.into_response())
}

/// Assembles the three-category chart DTO for one stored chart week.
fn charts_dto(
    group: &entity::chorus_group::Model,
    chart: &entity::group_week_chart::Model,
    entries: Vec<entity::group_week_entry::Model>,
) -> GroupChartsDto {
    let mut artists = Vec::new();
    let mut tracks = Vec::new();
    let mut albums = Vec::new();

    for entry in entries {
        let category = entry.category;
        let entry_dto = ChartEntryDto {
            position: entry.position,
            name: entry.name,
            artist: entry.artist,
            playcount: entry.playcount,
            score: entry.score,
            movement: entry.movement,
        };

        match category {
            entity::types::ChartCategory::Artist => artists.push(entry_dto),
            entity::types::ChartCategory::Track => tracks.push(entry_dto),
            entity::types::ChartCategory::Album => albums.push(entry_dto),
        }
    }

    GroupChartsDto {
        group_id: group.id,
        week_start: chart.week_start,
        week_end: chart.week_end,
        chart_mode: group.chart_mode.to_value(),
        artists,
        tracks,
        albums,
    }
}
