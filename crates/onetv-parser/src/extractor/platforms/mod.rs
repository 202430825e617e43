pub mod onetv;
