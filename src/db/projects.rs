//! Project rows: submission, slugs, launch transition, listings

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;

use crate::db::{is_unique_violation, new_id, now_secs};
use crate::error::Error;

/// Project row from the database
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub tagline: String,
    pub website_url: Option<String>,
    pub status: String,
    pub votes_count: i64,
    pub launched_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Project {
    fn from_row(row: &Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            slug: row.get("slug")?,
            name: row.get("name")?,
            tagline: row.get("tagline")?,
            website_url: row.get("website_url")?,
            status: row.get("status")?,
            votes_count: row.get("votes_count")?,
            launched_at: row.get("launched_at")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    pub fn is_launched(&self) -> bool {
        self.status == "launched"
    }

    pub fn summary(&self) -> ProjectSummary {
        ProjectSummary {
            id: self.id.clone(),
            slug: self.slug.clone(),
            name: self.name.clone(),
            votes_count: self.votes_count,
        }
    }
}

/// Compact project fields for leaderboard "best pick" entries
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub votes_count: i64,
}

/// Input for submitting a project
pub struct CreateProjectInput {
    pub name: String,
    pub tagline: String,
    pub website_url: Option<String>,
}

/// Turn a project name into a URL slug
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut last_dash = true; // suppress leading dashes

    for c in text.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if (c.is_whitespace() || c == '-' || c == '_') && !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }

    slug.trim_end_matches('-').to_string()
}

/// Generate a slug unique among existing projects, suffixing on collision
fn unique_slug(conn: &Connection, name: &str) -> Result<String, Error> {
    let base = slugify(name);
    if base.is_empty() {
        return Err(Error::validation("Project name produces an empty slug"));
    }

    let existing: i64 = conn.query_row(
        "SELECT COUNT(*) FROM projects WHERE slug LIKE ?",
        params![format!("{}%", base)],
        |row| row.get(0),
    )?;

    if existing == 0 {
        Ok(base)
    } else {
        Ok(format!("{}-{}", base, existing + 1))
    }
}

/// Insert a draft project and record the submitting agent as its owner
pub fn create_project(
    conn: &mut Connection,
    owner_id: &str,
    input: CreateProjectInput,
) -> Result<Project, Error> {
    let id = new_id();
    let now = now_secs();

    let tx = conn.transaction()?;

    let slug = unique_slug(&tx, &input.name)?;
    // The COUNT-based suffix can still land on a taken slug (gaps from
    // deletes, or a pre-existing suffixed slug); surface that as a
    // conflict the caller can retry instead of a storage failure
    let insert = tx.execute(
        "INSERT INTO projects (id, slug, name, tagline, website_url, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
        params![id, slug, input.name, input.tagline, input.website_url, now, now],
    );
    match insert {
        Ok(_) => {}
        Err(e) if is_unique_violation(&e) => {
            return Err(Error::Conflict(format!(
                "Slug '{}' is already taken, retry the submission",
                slug
            )))
        }
        Err(e) => return Err(e.into()),
    }
    tx.execute(
        "INSERT INTO project_creators (project_id, agent_id, role) VALUES (?, ?, 'owner')",
        params![id, owner_id],
    )?;

    tx.commit()?;

    get_project(conn, &id)?
        .ok_or_else(|| Error::Internal("Project not found after insert".to_string()))
}

/// Get a project by id
pub fn get_project(conn: &Connection, id: &str) -> Result<Option<Project>, Error> {
    let project = conn
        .query_row("SELECT * FROM projects WHERE id = ?", params![id], |row| {
            Project::from_row(row)
        })
        .optional()?;

    Ok(project)
}

/// Get a project by slug
pub fn get_by_slug(conn: &Connection, slug: &str) -> Result<Option<Project>, Error> {
    let project = conn
        .query_row(
            "SELECT * FROM projects WHERE slug = ?",
            params![slug],
            |row| Project::from_row(row),
        )
        .optional()?;

    Ok(project)
}

/// Agent ids of a project's creators
pub fn creator_ids(conn: &Connection, project_id: &str) -> Result<Vec<String>, Error> {
    let mut stmt =
        conn.prepare("SELECT agent_id FROM project_creators WHERE project_id = ?")?;

    let ids: Vec<String> = stmt
        .query_map(params![project_id], |row| row.get(0))?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ids)
}

/// List launched projects, newest launch first
pub fn list_launched(conn: &Connection, limit: u32, offset: u32) -> Result<Vec<Project>, Error> {
    let mut stmt = conn.prepare(
        "SELECT * FROM projects WHERE status = 'launched'
         ORDER BY launched_at DESC LIMIT ? OFFSET ?",
    )?;

    let projects: Vec<Project> = stmt
        .query_map(params![limit, offset], |row| Project::from_row(row))?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(projects)
}

/// Move a draft project to launched, stamping launched_at
pub fn launch_project(conn: &Connection, project_id: &str) -> Result<Project, Error> {
    let now = now_secs();
    conn.execute(
        "UPDATE projects SET status = 'launched', launched_at = ?, updated_at = ?
         WHERE id = ? AND status = 'draft'",
        params![now, now, project_id],
    )?;

    // Re-read rather than trusting change counts: a concurrent launch is
    // reported as a conflict by the caller inspecting status.
    get_project(conn, project_id)?
        .ok_or_else(|| Error::NotFound("Project".to_string()))
}
