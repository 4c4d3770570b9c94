//! Row structs bridging the Diesel schema and the domain entities.
//!
//! Enumerations persist as their stable string form; a stored value outside
//! the enumeration is a data fault and surfaces as a query error rather than
//! a panic.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{bootcamps, courses, reviews, users};
use crate::domain::ports::StoreError;
use crate::domain::{Bootcamp, Career, Course, Location, MinimumSkill, Review, Role, User};

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub role: String,
    pub password_hash: String,
    pub reset_password_token_hash: Option<String>,
    pub reset_password_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    pub fn from_domain(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            role: user.role.as_str().to_owned(),
            password_hash: user.password_hash.clone(),
            reset_password_token_hash: user.reset_password_token_hash.clone(),
            reset_password_expires_at: user.reset_password_expires_at,
            created_at: user.created_at,
        }
    }

    pub fn into_domain(self) -> Result<User, StoreError> {
        let role = Role::from_str_opt(&self.role).ok_or_else(|| {
            StoreError::query(format!("unknown role '{}' stored for user {}", self.role, self.id))
        })?;
        Ok(User {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            role,
            password_hash: self.password_hash,
            reset_password_token_hash: self.reset_password_token_hash,
            reset_password_expires_at: self.reset_password_expires_at,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = bootcamps)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BootcampRow {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub formatted_address: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
    pub country: Option<String>,
    pub careers: Vec<String>,
    pub average_rating: Option<f64>,
    pub average_cost: Option<f64>,
    pub photo: String,
    pub housing: bool,
    pub job_assistance: bool,
    pub job_guarantee: bool,
    pub accept_gi: bool,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl BootcampRow {
    pub fn from_domain(bootcamp: &Bootcamp) -> Self {
        Self {
            id: bootcamp.id,
            name: bootcamp.name.clone(),
            slug: bootcamp.slug.clone(),
            description: bootcamp.description.clone(),
            website: bootcamp.website.clone(),
            phone: bootcamp.phone.clone(),
            email: bootcamp.email.clone(),
            latitude: bootcamp.location.latitude(),
            longitude: bootcamp.location.longitude(),
            formatted_address: bootcamp.location.formatted_address.clone(),
            street: bootcamp.location.street.clone(),
            city: bootcamp.location.city.clone(),
            state: bootcamp.location.state.clone(),
            zipcode: bootcamp.location.zipcode.clone(),
            country: bootcamp.location.country.clone(),
            careers: bootcamp
                .careers
                .iter()
                .map(|career| career.as_str().to_owned())
                .collect(),
            average_rating: bootcamp.average_rating,
            average_cost: bootcamp.average_cost,
            photo: bootcamp.photo.clone(),
            housing: bootcamp.housing,
            job_assistance: bootcamp.job_assistance,
            job_guarantee: bootcamp.job_guarantee,
            accept_gi: bootcamp.accept_gi,
            user_id: bootcamp.user_id,
            created_at: bootcamp.created_at,
        }
    }

    pub fn into_domain(self) -> Result<Bootcamp, StoreError> {
        let careers = self
            .careers
            .iter()
            .map(|raw| {
                Career::from_str_opt(raw).ok_or_else(|| {
                    StoreError::query(format!(
                        "unknown career '{raw}' stored for bootcamp {}",
                        self.id
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Bootcamp {
            id: self.id,
            name: self.name,
            slug: self.slug,
            description: self.description,
            website: self.website,
            phone: self.phone,
            email: self.email,
            location: Location {
                kind: "Point",
                coordinates: [self.longitude, self.latitude],
                formatted_address: self.formatted_address,
                street: self.street,
                city: self.city,
                state: self.state,
                zipcode: self.zipcode,
                country: self.country,
            },
            careers,
            average_rating: self.average_rating,
            average_cost: self.average_cost,
            photo: self.photo,
            housing: self.housing,
            job_assistance: self.job_assistance,
            job_guarantee: self.job_guarantee,
            accept_gi: self.accept_gi,
            user_id: self.user_id,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = courses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CourseRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub weeks: i32,
    pub tuition: f64,
    pub minimum_skill: String,
    pub scholarship_available: bool,
    pub bootcamp_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl CourseRow {
    pub fn from_domain(course: &Course) -> Self {
        Self {
            id: course.id,
            title: course.title.clone(),
            description: course.description.clone(),
            weeks: course.weeks,
            tuition: course.tuition,
            minimum_skill: course.minimum_skill.as_str().to_owned(),
            scholarship_available: course.scholarship_available,
            bootcamp_id: course.bootcamp_id,
            user_id: course.user_id,
            created_at: course.created_at,
        }
    }

    pub fn into_domain(self) -> Result<Course, StoreError> {
        let minimum_skill = MinimumSkill::from_str_opt(&self.minimum_skill).ok_or_else(|| {
            StoreError::query(format!(
                "unknown minimum skill '{}' stored for course {}",
                self.minimum_skill, self.id
            ))
        })?;
        Ok(Course {
            id: self.id,
            title: self.title,
            description: self.description,
            weeks: self.weeks,
            tuition: self.tuition,
            minimum_skill,
            scholarship_available: self.scholarship_available,
            bootcamp_id: self.bootcamp_id,
            user_id: self.user_id,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ReviewRow {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub rating: i32,
    pub bootcamp_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl ReviewRow {
    pub fn from_domain(review: &Review) -> Self {
        Self {
            id: review.id,
            title: review.title.clone(),
            body: review.text.clone(),
            rating: review.rating,
            bootcamp_id: review.bootcamp_id,
            user_id: review.user_id,
            created_at: review.created_at,
        }
    }

    pub fn into_domain(self) -> Review {
        Review {
            id: self.id,
            title: self.title,
            text: self.body,
            rating: self.rating,
            bootcamp_id: self.bootcamp_id,
            user_id: self.user_id,
            created_at: self.created_at,
        }
    }
}
