use crate :: builtin :: * ; use crate :: meta :: { Signature , ToGodot } ; use crate :: obj :: { Gd , Inherits , ObjectArg } ; use crate :: sys ; # [doc = "Engine class `Vector2Sum`."] # [derive (Debug)] # [repr (C)] pub struct Vector2Sum { object_ptr : sys :: GDExtensionObjectPtr , } impl Vector2Sum { pub const MAX_VALUES : i64 = 64 ; # [doc = "Calls `Vector2Sum::add`."] pub fn add (& self , a : f64 , b : f64) -> f64 { unsafe { Signature :: < (f64 , f64 ,) , f64 > :: out_class_ptrcall (crate :: gen :: central :: method_index :: Vector2Sum__add , self . object_ptr , (a , b ,) ,) } } # [doc = "Calls `Vector2Sum::add_vectors`."] pub fn add_vectors (& self , a : Vector2 , b : Vector2) -> Vector2 { unsafe { Signature :: < (Vector2 , Vector2 ,) , Vector2 > :: out_class_ptrcall (crate :: gen :: central :: method_index :: Vector2Sum__add_vectors , self . object_ptr , (a , b ,) ,) } } # [doc = "Calls `Vector2Sum::scale`, with default arguments."] pub fn scale (& self , v : Vector2) -> Vector2 { self . scale_ex (v) . done () } # [doc = "Calls `Vector2Sum::scale`; the returned builder allows overriding default arguments before [`ExScale::done()`]."] pub fn scale_ex < 'a > (& 'a self , v : Vector2) -> ExScale < 'a > { ExScale :: new (self , v) } fn scale_full (& self , v : Vector2 , factor : f64) -> Vector2 { unsafe { Signature :: < (Vector2 , f64 ,) , Vector2 > :: out_class_ptrcall (crate :: gen :: central :: method_index :: Vector2Sum__scale , self . object_ptr , (v , factor ,) ,) } } # [doc = "Calls `Vector2Sum::sum_array`."] pub fn sum_array (& self , values : & PackedFloat64Array) -> f64 { unsafe { Signature :: < (& PackedFloat64Array ,) , f64 > :: out_class_ptrcall (crate :: gen :: central :: method_index :: Vector2Sum__sum_array , self . object_ptr , (values ,) ,) } } # [doc = "Calls `Vector2Sum::join`, with default arguments."] pub fn join (& self , parts : & PackedStringArray) -> GString { self . join_ex (parts) . done () } # [doc = "Calls `Vector2Sum::join`; the returned builder allows overriding default arguments before [`ExJoin::done()`]."] pub fn join_ex < 'a > (& 'a self , parts : & 'a PackedStringArray) -> ExJoin < 'a > { ExJoin :: new (self , parts) } fn join_full (& self , parts : & PackedStringArray , separator : GString) -> GString { unsafe { Signature :: < (& PackedStringArray , GString ,) , GString > :: out_class_ptrcall (crate :: gen :: central :: method_index :: Vector2Sum__join , self . object_ptr , (parts , separator ,) ,) } } # [doc = "Calls `Vector2Sum::check_positive`."] pub fn check_positive (& self , value : i64) -> crate :: global :: Error { unsafe { Signature :: < (i64 ,) , crate :: global :: Error > :: out_class_ptrcall (crate :: gen :: central :: method_index :: Vector2Sum__check_positive , self . object_ptr , (value ,) ,) } } # [doc = "Calls `Vector2Sum::fill_squares`."] # [doc = ""] # [doc = "# Safety"] # [doc = "Raw pointers must be valid for the number of elements the engine reads or writes."] pub unsafe fn fill_squares (& self , buffer : * mut f32 , count : i32) { unsafe { Signature :: < (* mut f32 , i32 ,) , () > :: out_class_ptrcall (crate :: gen :: central :: method_index :: Vector2Sum__fill_squares , self . object_ptr , (buffer , count ,) ,) } } # [doc = "Calls `Vector2Sum::push_value`."] pub fn push_value (& mut self , value : i64) { unsafe { Signature :: < (i64 ,) , () > :: out_class_ptrcall (crate :: gen :: central :: method_index :: Vector2Sum__push_value , self . object_ptr , (value ,) ,) } } # [doc = "Calls `Vector2Sum::values`."] pub fn values (& self ,) -> PackedInt64Array { unsafe { Signature :: < () , PackedInt64Array > :: out_class_ptrcall (crate :: gen :: central :: method_index :: Vector2Sum__values , self . object_ptr , () ,) } } # [doc = "Calls `Vector2Sum::values`."] pub fn values_mut (& mut self ,) -> PackedInt64Array { unsafe { Signature :: < () , PackedInt64Array > :: out_class_ptrcall (crate :: gen :: central :: method_index :: Vector2Sum__values_mut , self . object_ptr , () ,) } } # [doc = "Calls `Vector2Sum::combine`."] pub fn combine (& self , a : f64 , b : f64) -> f64 { unsafe { Signature :: < (f64 , f64 ,) , f64 > :: out_class_ptrcall (crate :: gen :: central :: method_index :: Vector2Sum__combine , self . object_ptr , (a , b ,) ,) } } # [doc = "View of this object as its base class `RefCounted`."] pub fn as_ref_counted (& self) -> & crate :: classes :: RefCounted { unsafe { & * (self as * const Self as * const crate :: classes :: RefCounted) } } # [doc = "View of this object as its base class `RefCounted`."] pub fn as_ref_counted_mut (& mut self) -> & mut crate :: classes :: RefCounted { unsafe { & mut * (self as * mut Self as * mut crate :: classes :: RefCounted) } } # [doc = "View of this object as its base class `Object`."] pub fn as_object (& self) -> & crate :: classes :: Object { unsafe { & * (self as * const Self as * const crate :: classes :: Object) } } # [doc = "View of this object as its base class `Object`."] pub fn as_object_mut (& mut self) -> & mut crate :: classes :: Object { unsafe { & mut * (self as * mut Self as * mut crate :: classes :: Object) } } } # [doc = r" Signals."] impl Vector2Sum { # [doc = "Connects `callable` to the signal `summed`."] pub fn connect_summed (& mut self , callable : & Callable) -> crate :: global :: Error { self . connect ("summed" , callable) } # [doc = "Emits the signal `summed`."] pub fn emit_summed (& mut self , result : f64) -> crate :: global :: Error { self . emit_signal ("summed" , & [result . to_variant ()]) } } impl crate :: obj :: GodotClass for Vector2Sum { type Base = crate :: classes :: RefCounted ; const CLASS_NAME : & 'static str = "Vector2Sum" ; fn class_name_c () -> & 'static std :: ffi :: CStr { c"Vector2Sum" } } unsafe impl crate :: obj :: Bounds for Vector2Sum { type Memory = crate :: obj :: bounds :: MemRefCounted ; type DynMemory = crate :: obj :: bounds :: MemRefCounted ; type Declarer = crate :: obj :: bounds :: DeclEngine ; } unsafe impl crate :: obj :: Inherits < crate :: classes :: RefCounted > for Vector2Sum { } unsafe impl crate :: obj :: Inherits < crate :: classes :: Object > for Vector2Sum { } impl std :: ops :: Deref for Vector2Sum { type Target = crate :: classes :: RefCounted ; fn deref (& self) -> & Self :: Target { unsafe { & * (self as * const Self as * const Self :: Target) } } } impl std :: ops :: DerefMut for Vector2Sum { fn deref_mut (& mut self) -> & mut Self :: Target { unsafe { & mut * (self as * mut Self as * mut Self :: Target) } } } impl crate :: obj :: cap :: GodotDefault for Vector2Sum { } # [doc (hidden)] # [macro_export] macro_rules ! inherit_from_Vector2Sum__gdbind { ($ Class : ty) => { unsafe impl :: gdbind :: obj :: Inherits < :: gdbind :: classes :: Vector2Sum > for $ Class { } unsafe impl :: gdbind :: obj :: Inherits < :: gdbind :: classes :: RefCounted > for $ Class { } unsafe impl :: gdbind :: obj :: Inherits < :: gdbind :: classes :: Object > for $ Class { } } ; } # [doc = "Virtual methods of `Vector2Sum` and its base classes, to override in a host class with `#[godot_api]`."] # [allow (unused_variables)] pub trait IVector2Sum : crate :: obj :: GodotClass + crate :: private :: You_forgot_the_attribute__godot_api { # [doc = r" Default constructor of the host class, receiving the handle to its engine base."] fn init (base : crate :: obj :: Base < Self :: Base >) -> Self where Self : Sized , { unimplemented ! () } # [doc = "Override of the engine's `_combine`."] fn combine (& self , a : f64 , b : f64) -> f64 { unimplemented ! () } } # [doc = "Default-parameter builder for [`Vector2Sum::scale_ex()`]."] # [must_use] pub struct ExScale < 'a > { surround_object : & 'a Vector2Sum , v : Vector2 , factor : f64 , } # [allow (clippy :: redundant_field_names , clippy :: needless_update)] impl < 'a > ExScale < 'a > { fn new (surround_object : & 'a Vector2Sum , v : Vector2) -> Self { Self { surround_object , v , factor : 2.0 as f64 , } } # [doc = "Overrides the default of `factor`."] pub fn factor (self , factor : f64) -> Self { Self { factor : factor , .. self } } # [doc = r" Performs the call."] pub fn done (self) -> Vector2 { let Self { surround_object , v , factor } = self ; surround_object . scale_full (v , factor) } } # [doc = "Default-parameter builder for [`Vector2Sum::join_ex()`]."] # [must_use] pub struct ExJoin < 'a > { surround_object : & 'a Vector2Sum , parts : & 'a PackedStringArray , separator : GString , } # [allow (clippy :: redundant_field_names , clippy :: needless_update)] impl < 'a > ExJoin < 'a > { fn new (surround_object : & 'a Vector2Sum , parts : & 'a PackedStringArray) -> Self { Self { surround_object , parts , separator : GString :: from (", ") , } } # [doc = "Overrides the default of `separator`."] pub fn separator (self , separator : impl Into < GString >) -> Self { Self { separator : separator . into () , .. self } } # [doc = r" Performs the call."] pub fn done (self) -> GString { let Self { surround_object , parts , separator } = self ; surround_object . join_full (parts , separator) } }