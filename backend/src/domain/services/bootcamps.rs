//! Bootcamp orchestration: CRUD, the publish limit, geocoding, radius
//! search, and photo uploads.

use std::sync::Arc;

use chrono::Utc;
use listing::ListQuery;
use uuid::Uuid;

use crate::domain::geo::{haversine_miles, EARTH_RADIUS_MILES};
use crate::domain::ports::{BootcampRepository, GeocodedAddress, Geocoder, PhotoStore};
use crate::domain::{
    slugify, Bootcamp, CreateBootcamp, Error, Location, UpdateBootcamp, User, DEFAULT_PHOTO,
};

/// A raw photo upload as received by the transport.
pub struct PhotoUpload {
    /// Declared media type, e.g. `image/jpeg`.
    pub content_type: String,
    /// File bytes.
    pub bytes: Vec<u8>,
}

fn not_found(id: Uuid) -> Error {
    Error::not_found(format!("Bootcamp not found with id of {id}"))
}

fn location_from(geocoded: GeocodedAddress) -> Location {
    Location {
        kind: "Point",
        coordinates: [geocoded.longitude, geocoded.latitude],
        formatted_address: geocoded.formatted_address,
        street: geocoded.street,
        city: geocoded.city,
        state: geocoded.state,
        zipcode: geocoded.zipcode,
        country: geocoded.country,
    }
}

/// Bootcamp resource rules.
#[derive(Clone)]
pub struct BootcampService {
    bootcamps: Arc<dyn BootcampRepository>,
    geocoder: Arc<dyn Geocoder>,
    photos: Arc<dyn PhotoStore>,
    max_photo_bytes: usize,
}

impl BootcampService {
    /// Wire the service. `max_photo_bytes` caps uploads.
    #[must_use]
    pub fn new(
        bootcamps: Arc<dyn BootcampRepository>,
        geocoder: Arc<dyn Geocoder>,
        photos: Arc<dyn PhotoStore>,
        max_photo_bytes: usize,
    ) -> Self {
        Self {
            bootcamps,
            geocoder,
            photos,
            max_photo_bytes,
        }
    }

    /// One page of bootcamps plus the filtered total.
    ///
    /// # Errors
    ///
    /// Store failures map per [`crate::domain::ports::StoreError`].
    pub async fn list(&self, query: &ListQuery) -> Result<(Vec<Bootcamp>, u64), Error> {
        Ok(self.bootcamps.list(query).await?)
    }

    /// A single bootcamp by id.
    ///
    /// # Errors
    ///
    /// [`Error::not_found`] when the id does not exist.
    pub async fn get(&self, id: Uuid) -> Result<Bootcamp, Error> {
        self.bootcamps
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Publish a bootcamp owned by `actor`.
    ///
    /// Non-admin accounts may publish exactly one; the submitted address is
    /// geocoded and only the derived location persists.
    ///
    /// # Errors
    ///
    /// [`Error::limit_exceeded`] on a second publish,
    /// [`Error::invalid_request`] for validation and geocoding misses.
    pub async fn create(&self, actor: &User, input: CreateBootcamp) -> Result<Bootcamp, Error> {
        input.validate()?;
        if !actor.is_admin() && self.bootcamps.find_by_owner(actor.id).await?.is_some() {
            return Err(Error::limit_exceeded(format!(
                "The user with ID {} has already published a bootcamp",
                actor.id
            )));
        }

        let location = location_from(self.geocoder.geocode(&input.address).await?);
        let bootcamp = Bootcamp {
            id: Uuid::new_v4(),
            slug: slugify(&input.name),
            name: input.name,
            description: input.description,
            website: input.website,
            phone: input.phone,
            email: input.email,
            location,
            careers: input.careers,
            average_rating: None,
            average_cost: None,
            photo: DEFAULT_PHOTO.to_owned(),
            housing: input.housing,
            job_assistance: input.job_assistance,
            job_guarantee: input.job_guarantee,
            accept_gi: input.accept_gi,
            user_id: actor.id,
            created_at: Utc::now(),
        };
        self.bootcamps.insert(&bootcamp).await?;
        tracing::info!(bootcamp_id = %bootcamp.id, user_id = %actor.id, "bootcamp published");
        Ok(bootcamp)
    }

    /// Apply a partial update; a new address re-geocodes, a new name
    /// re-slugs.
    ///
    /// # Errors
    ///
    /// [`Error::forbidden`] unless `actor` owns the bootcamp or is admin.
    pub async fn update(
        &self,
        actor: &User,
        id: Uuid,
        input: UpdateBootcamp,
    ) -> Result<Bootcamp, Error> {
        input.validate()?;
        let mut bootcamp = self.get(id).await?;
        if !actor.may_modify(bootcamp.user_id) {
            return Err(Error::forbidden(format!(
                "User {} is not authorized to update this bootcamp",
                actor.id
            )));
        }

        if let Some(name) = input.name {
            bootcamp.slug = slugify(&name);
            bootcamp.name = name;
        }
        if let Some(description) = input.description {
            bootcamp.description = description;
        }
        if let Some(website) = input.website {
            bootcamp.website = Some(website);
        }
        if let Some(phone) = input.phone {
            bootcamp.phone = Some(phone);
        }
        if let Some(email) = input.email {
            bootcamp.email = Some(email);
        }
        if let Some(address) = input.address {
            bootcamp.location = location_from(self.geocoder.geocode(&address).await?);
        }
        if let Some(careers) = input.careers {
            bootcamp.careers = careers;
        }
        if let Some(housing) = input.housing {
            bootcamp.housing = housing;
        }
        if let Some(job_assistance) = input.job_assistance {
            bootcamp.job_assistance = job_assistance;
        }
        if let Some(job_guarantee) = input.job_guarantee {
            bootcamp.job_guarantee = job_guarantee;
        }
        if let Some(accept_gi) = input.accept_gi {
            bootcamp.accept_gi = accept_gi;
        }

        self.bootcamps.update(&bootcamp).await?;
        Ok(bootcamp)
    }

    /// Delete a bootcamp and everything attached to it.
    ///
    /// # Errors
    ///
    /// [`Error::forbidden`] unless `actor` owns the bootcamp or is admin.
    pub async fn delete(&self, actor: &User, id: Uuid) -> Result<(), Error> {
        let bootcamp = self.get(id).await?;
        if !actor.may_modify(bootcamp.user_id) {
            return Err(Error::forbidden(format!(
                "User {} is not authorized to delete this bootcamp",
                actor.id
            )));
        }
        if !self.bootcamps.delete_cascading(id).await? {
            return Err(not_found(id));
        }
        tracing::info!(bootcamp_id = %id, "bootcamp deleted");
        Ok(())
    }

    /// Bootcamps within `distance_miles` of a zipcode's geocoded centre.
    ///
    /// The store prunes by bounding box; the exact great-circle check
    /// happens here.
    ///
    /// # Errors
    ///
    /// [`Error::invalid_request`] for a non-positive distance or an
    /// un-geocodable zipcode.
    pub async fn within_radius(
        &self,
        zipcode: &str,
        distance_miles: f64,
    ) -> Result<Vec<Bootcamp>, Error> {
        if !(distance_miles.is_finite() && distance_miles > 0.0) {
            return Err(Error::invalid_request("Please provide a positive distance"));
        }
        let centre = self.geocoder.geocode(zipcode).await?;

        let angular = distance_miles / EARTH_RADIUS_MILES;
        let lat_delta = angular.to_degrees();
        // Longitude degrees shrink with latitude; clamp away from the poles.
        let lng_delta = (angular / centre.latitude.to_radians().cos().abs().max(1e-6)).to_degrees();

        let candidates = self
            .bootcamps
            .find_within_box(
                centre.latitude - lat_delta,
                centre.latitude + lat_delta,
                centre.longitude - lng_delta,
                centre.longitude + lng_delta,
            )
            .await?;

        Ok(candidates
            .into_iter()
            .filter(|b| {
                haversine_miles(
                    (centre.latitude, centre.longitude),
                    (b.location.latitude(), b.location.longitude()),
                ) <= distance_miles
            })
            .collect())
    }

    /// Store an uploaded photo and record its filename on the bootcamp.
    ///
    /// # Errors
    ///
    /// [`Error::invalid_request`] for non-image uploads, unsupported image
    /// types, and oversized files; [`Error::forbidden`] for non-owners.
    pub async fn upload_photo(
        &self,
        actor: &User,
        id: Uuid,
        upload: PhotoUpload,
    ) -> Result<String, Error> {
        let mut bootcamp = self.get(id).await?;
        if !actor.may_modify(bootcamp.user_id) {
            return Err(Error::forbidden(format!(
                "User {} is not authorized to update this bootcamp",
                actor.id
            )));
        }
        if !upload.content_type.starts_with("image/") {
            return Err(Error::invalid_request("Please upload an image file"));
        }
        if upload.bytes.len() > self.max_photo_bytes {
            return Err(Error::invalid_request(format!(
                "Please upload an image less than {} bytes",
                self.max_photo_bytes
            )));
        }
        let extension = match upload.content_type.as_str() {
            "image/jpeg" => "jpg",
            "image/png" => "png",
            "image/gif" => "gif",
            "image/webp" => "webp",
            other => {
                return Err(Error::invalid_request(format!(
                    "Unsupported image type '{other}'"
                )))
            }
        };

        let filename = format!("photo_{id}.{extension}");
        self.photos
            .store(&filename, &upload.bytes)
            .await
            .map_err(|err| {
                tracing::error!(error = %err, bootcamp_id = %id, "photo store failed");
                Error::upstream("Problem with file upload")
            })?;

        bootcamp.photo = filename.clone();
        self.bootcamps.update(&bootcamp).await?;
        Ok(filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::services::fakes::{
        FakeBootcampRepo, FakeGeocoder, FakePhotoStore, FakeStore,
    };
    use crate::domain::{Career, Course, ErrorCode, Review, Role};

    fn actor(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            first_name: "Ada".into(),
            last_name: None,
            email: "ada@example.com".into(),
            role,
            password_hash: "digest".into(),
            reset_password_token_hash: None,
            reset_password_expires_at: None,
            created_at: Utc::now(),
        }
    }

    fn create_input(name: &str) -> CreateBootcamp {
        CreateBootcamp {
            name: name.into(),
            description: "Full stack development".into(),
            website: None,
            phone: None,
            email: None,
            address: "233 Bay State Rd Boston MA 02215".into(),
            careers: vec![Career::WebDevelopment],
            housing: false,
            job_assistance: false,
            job_guarantee: false,
            accept_gi: false,
        }
    }

    fn service(store: &Arc<FakeStore>) -> BootcampService {
        BootcampService::new(
            Arc::new(FakeBootcampRepo::new(store.clone())),
            Arc::new(FakeGeocoder::at(42.3505, -71.1054)),
            Arc::new(FakePhotoStore::default()),
            1024,
        )
    }

    fn service_with_photos(
        store: &Arc<FakeStore>,
        photos: Arc<FakePhotoStore>,
    ) -> BootcampService {
        BootcampService::new(
            Arc::new(FakeBootcampRepo::new(store.clone())),
            Arc::new(FakeGeocoder::at(42.3505, -71.1054)),
            photos,
            1024,
        )
    }

    #[actix_rt::test]
    async fn create_geocodes_slugs_and_defaults_the_photo() {
        let store = Arc::new(FakeStore::default());
        let svc = service(&store);
        let publisher = actor(Role::Publisher);

        let bootcamp = svc
            .create(&publisher, create_input("Devworks Bootcamp"))
            .await
            .unwrap();
        assert_eq!(bootcamp.slug, "devworks-bootcamp");
        assert_eq!(bootcamp.photo, DEFAULT_PHOTO);
        assert_eq!(bootcamp.location.coordinates, [-71.1054, 42.3505]);
        assert_eq!(bootcamp.location.city.as_deref(), Some("Boston"));
        assert_eq!(bootcamp.user_id, publisher.id);
    }

    #[actix_rt::test]
    async fn second_publish_by_the_same_publisher_hits_the_limit() {
        let store = Arc::new(FakeStore::default());
        let svc = service(&store);
        let publisher = actor(Role::Publisher);

        svc.create(&publisher, create_input("First")).await.unwrap();
        let err = svc
            .create(&publisher, create_input("Second"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::LimitExceeded);
    }

    #[actix_rt::test]
    async fn admins_are_exempt_from_the_publish_limit() {
        let store = Arc::new(FakeStore::default());
        let svc = service(&store);
        let admin = actor(Role::Admin);

        svc.create(&admin, create_input("First")).await.unwrap();
        assert!(svc.create(&admin, create_input("Second")).await.is_ok());
    }

    #[actix_rt::test]
    async fn non_owner_cannot_update_but_admin_can() {
        let store = Arc::new(FakeStore::default());
        let svc = service(&store);
        let owner = actor(Role::Publisher);
        let bootcamp = svc.create(&owner, create_input("Devworks")).await.unwrap();

        let stranger = actor(Role::Publisher);
        let update = UpdateBootcamp {
            housing: Some(true),
            ..UpdateBootcamp::default()
        };
        let err = svc
            .update(&stranger, bootcamp.id, update.clone())
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::Forbidden);

        let admin = actor(Role::Admin);
        let updated = svc.update(&admin, bootcamp.id, update).await.unwrap();
        assert!(updated.housing);
    }

    #[actix_rt::test]
    async fn renaming_regenerates_the_slug() {
        let store = Arc::new(FakeStore::default());
        let svc = service(&store);
        let owner = actor(Role::Publisher);
        let bootcamp = svc.create(&owner, create_input("Devworks")).await.unwrap();

        let updated = svc
            .update(
                &owner,
                bootcamp.id,
                UpdateBootcamp {
                    name: Some("ModernTech Bootcamp".into()),
                    ..UpdateBootcamp::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.slug, "moderntech-bootcamp");
    }

    #[actix_rt::test]
    async fn delete_cascades_to_courses_and_reviews() {
        let store = Arc::new(FakeStore::default());
        let svc = service(&store);
        let owner = actor(Role::Publisher);
        let bootcamp = svc.create(&owner, create_input("Devworks")).await.unwrap();
        store.seed_course(Course {
            id: Uuid::new_v4(),
            title: "Front End".into(),
            description: "HTML and CSS".into(),
            weeks: 8,
            tuition: 8000.0,
            minimum_skill: crate::domain::MinimumSkill::Beginner,
            scholarship_available: false,
            bootcamp_id: bootcamp.id,
            user_id: owner.id,
            created_at: Utc::now(),
        });
        store.seed_review(Review {
            id: Uuid::new_v4(),
            title: "Great".into(),
            text: "Loved it".into(),
            rating: 9,
            bootcamp_id: bootcamp.id,
            user_id: Uuid::new_v4(),
            created_at: Utc::now(),
        });

        svc.delete(&owner, bootcamp.id).await.unwrap();
        assert!(store.bootcamp(bootcamp.id).is_none());
        assert_eq!(store.course_count(bootcamp.id), 0);
        assert_eq!(store.review_count(bootcamp.id), 0);
    }

    #[actix_rt::test]
    async fn radius_search_keeps_only_bootcamps_inside_the_circle() {
        let store = Arc::new(FakeStore::default());
        let svc = service(&store);
        let owner = actor(Role::Admin);

        // Geocoder pins both at Boston; move one to Los Angeles after create.
        let near = svc.create(&owner, create_input("Near")).await.unwrap();
        let far = svc.create(&owner, create_input("Far")).await.unwrap();
        let mut moved = store.bootcamp(far.id).unwrap();
        moved.location.coordinates = [-118.2437, 34.0522];
        store.seed_bootcamp(Bootcamp { id: Uuid::new_v4(), ..moved.clone() });

        let found = svc.within_radius("02215", 50.0).await.unwrap();
        assert!(found.iter().any(|b| b.id == near.id));
        assert!(!found.iter().any(|b| b.location.coordinates[0] < -100.0));
    }

    #[actix_rt::test]
    async fn zero_distance_is_rejected() {
        let store = Arc::new(FakeStore::default());
        let svc = service(&store);
        let err = svc.within_radius("02215", 0.0).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[actix_rt::test]
    async fn photo_upload_validates_type_and_size() {
        let store = Arc::new(FakeStore::default());
        let photos = Arc::new(FakePhotoStore::default());
        let svc = service_with_photos(&store, photos.clone());
        let owner = actor(Role::Publisher);
        let bootcamp = svc.create(&owner, create_input("Devworks")).await.unwrap();

        let pdf = PhotoUpload {
            content_type: "application/pdf".into(),
            bytes: vec![0; 16],
        };
        assert_eq!(
            svc.upload_photo(&owner, bootcamp.id, pdf)
                .await
                .unwrap_err()
                .code(),
            ErrorCode::InvalidRequest
        );

        let huge = PhotoUpload {
            content_type: "image/png".into(),
            bytes: vec![0; 2048],
        };
        assert_eq!(
            svc.upload_photo(&owner, bootcamp.id, huge)
                .await
                .unwrap_err()
                .code(),
            ErrorCode::InvalidRequest
        );

        let ok = PhotoUpload {
            content_type: "image/png".into(),
            bytes: vec![0; 512],
        };
        let filename = svc.upload_photo(&owner, bootcamp.id, ok).await.unwrap();
        assert_eq!(filename, format!("photo_{}.png", bootcamp.id));
        assert_eq!(photos.last(), Some((filename.clone(), 512)));
        assert_eq!(store.bootcamp(bootcamp.id).unwrap().photo, filename);
    }
}
